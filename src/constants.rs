//! App-wide constants.
//!
//! Centralises the tool name, config paths, environment variable names,
//! and default limits so a rename only requires changing this file.

/// Display name of the tool (lowercase).
pub const APP_NAME: &str = "redline";

/// Local config filename (e.g. `.redline.toml` in the working directory).
pub const CONFIG_FILENAME: &str = ".redline.toml";

/// Directory name under `~/.config/` for the global config.
pub const CONFIG_DIR: &str = "redline";

/// Default maximum number of inline comments per reviewed file.
pub const DEFAULT_FILE_CAP: usize = 10;

/// Default maximum number of inline comments per run.
pub const DEFAULT_GLOBAL_CAP: usize = 20;

/// Upper bound on diff text sent to the generator, in characters.
pub const MAX_DIFF_CHARS: usize = 100_000;

/// Marker appended when the diff is cut at [`MAX_DIFF_CHARS`].
pub const TRUNCATION_MARKER: &str = "\n... (truncated due to length limit)...";

/// Default REST endpoint of the hosting service.
pub const DEFAULT_BASE_API: &str = "https://api.github.com";

/// Default object prefix for review guideline documents.
pub const DEFAULT_GUIDELINE_PREFIX: &str = "guidelines/";

// ── Environment variable names ──────────────────────────────────────

pub const ENV_PROVIDER: &str = "REDLINE_PROVIDER";
pub const ENV_MODEL: &str = "REDLINE_MODEL";
pub const ENV_API_KEY: &str = "REDLINE_API_KEY";
pub const ENV_BASE_URL: &str = "REDLINE_BASE_URL";
pub const ENV_HOST_TOKEN: &str = "GITHUB_TOKEN";
pub const ENV_REPOSITORY: &str = "GITHUB_REPOSITORY";
pub const ENV_CHANGE_NUMBER: &str = "PR_NUMBER";
