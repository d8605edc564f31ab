//! Config struct and loading logic.
//!
//! Priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables
//! 3. `.redline.toml` in the working directory
//! 4. `~/.config/redline/config.toml` (global defaults)
//! 5. Built-in defaults

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::constants;
use crate::env::Env;
use crate::models::ProviderName;

/// Errors during config loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseFile {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub review: ReviewConfig,
    pub provider: ProviderConfig,
    pub host: HostConfig,
    pub guidelines: GuidelineConfig,
}

/// Review scheduling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// Maximum inline comments per file.
    pub file_cap: usize,
    /// Maximum inline comments per run.
    pub global_cap: usize,
    /// Maximum files reviewed concurrently.
    pub max_concurrent: usize,
    /// Per-call timeout for generation requests, in seconds.
    pub generate_timeout_secs: u64,
    /// Per-call timeout for posting requests, in seconds.
    pub post_timeout_secs: u64,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            file_cap: constants::DEFAULT_FILE_CAP,
            global_cap: constants::DEFAULT_GLOBAL_CAP,
            max_concurrent: 4,
            generate_timeout_secs: 120,
            post_timeout_secs: 30,
        }
    }
}

/// LLM provider configuration.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub name: ProviderName,
    pub model: String,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("name", &self.name)
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: ProviderName::Gemini,
            model: "gemini-2.0-flash".to_string(),
            base_url: None,
            api_key: None,
        }
    }
}

/// Hosting service configuration.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// REST API root of the hosting service.
    pub base_api: String,
    /// Repository slug, e.g. `owner/name`.
    pub repo: Option<String>,
    /// Access token.
    pub token: Option<String>,
}

impl std::fmt::Debug for HostConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostConfig")
            .field("base_api", &self.base_api)
            .field("repo", &self.repo)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            base_api: constants::DEFAULT_BASE_API.to_string(),
            repo: None,
            token: None,
        }
    }
}

/// Guideline store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GuidelineConfig {
    /// Bucket holding guideline documents; unset disables the fetch.
    pub bucket: Option<String>,
    /// Object prefix for guideline markdown files.
    pub prefix: String,
    /// Optional object prefix for prior review discussion.
    pub history_prefix: Option<String>,
}

impl Default for GuidelineConfig {
    fn default() -> Self {
        Self {
            bucket: None,
            prefix: constants::DEFAULT_GUIDELINE_PREFIX.to_string(),
            history_prefix: None,
        }
    }
}

impl Config {
    /// Load configuration with proper layering.
    ///
    /// Reads from global config, then local config, then applies
    /// environment variable overrides.
    pub fn load(work_dir: Option<&Path>, env: &Env) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        // Layer 4: global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                let global = Self::load_file(&global_path)?;
                config.merge(global);
            }
        }

        // Layer 3: local config
        if let Some(dir) = work_dir {
            let local_path = dir.join(constants::CONFIG_FILENAME);
            if local_path.exists() {
                let local = Self::load_file(&local_path)?;
                config.merge(local);
            }
        }

        // Layer 2: environment variables
        config.apply_env_vars(env);

        Ok(config)
    }

    /// Load a config from a specific file.
    fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the global config file path.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(constants::CONFIG_DIR).join("config.toml"))
    }

    /// Merge another config into this one (other takes precedence for
    /// non-default values).
    fn merge(&mut self, other: Config) {
        // Review settings
        let default_review = ReviewConfig::default();
        if other.review.file_cap != default_review.file_cap {
            self.review.file_cap = other.review.file_cap;
        }
        if other.review.global_cap != default_review.global_cap {
            self.review.global_cap = other.review.global_cap;
        }
        if other.review.max_concurrent != default_review.max_concurrent {
            self.review.max_concurrent = other.review.max_concurrent;
        }
        if other.review.generate_timeout_secs != default_review.generate_timeout_secs {
            self.review.generate_timeout_secs = other.review.generate_timeout_secs;
        }
        if other.review.post_timeout_secs != default_review.post_timeout_secs {
            self.review.post_timeout_secs = other.review.post_timeout_secs;
        }

        // Provider settings
        let default_provider = ProviderConfig::default();
        if other.provider.name != default_provider.name {
            self.provider.name = other.provider.name;
        }
        if other.provider.model != default_provider.model {
            self.provider.model = other.provider.model;
        }
        if other.provider.base_url.is_some() {
            self.provider.base_url = other.provider.base_url;
        }
        if other.provider.api_key.is_some() {
            self.provider.api_key = other.provider.api_key;
        }

        // Host settings
        let default_host = HostConfig::default();
        if other.host.base_api != default_host.base_api {
            self.host.base_api = other.host.base_api;
        }
        if other.host.repo.is_some() {
            self.host.repo = other.host.repo;
        }
        if other.host.token.is_some() {
            self.host.token = other.host.token;
        }

        // Guideline settings
        let default_guidelines = GuidelineConfig::default();
        if other.guidelines.bucket.is_some() {
            self.guidelines.bucket = other.guidelines.bucket;
        }
        if other.guidelines.prefix != default_guidelines.prefix {
            self.guidelines.prefix = other.guidelines.prefix;
        }
        if other.guidelines.history_prefix.is_some() {
            self.guidelines.history_prefix = other.guidelines.history_prefix;
        }
    }

    /// Apply environment variable overrides.
    fn apply_env_vars(&mut self, env: &Env) {
        if let Ok(val) = env.var(constants::ENV_PROVIDER) {
            if let Ok(name) = val.parse::<ProviderName>() {
                self.provider.name = name;
            } else {
                eprintln!(
                    "Warning: ignoring invalid {} value: {val}",
                    constants::ENV_PROVIDER
                );
            }
        }
        if let Ok(val) = env.var(constants::ENV_MODEL) {
            self.provider.model = val;
        }
        if let Ok(val) = env.var(constants::ENV_BASE_URL) {
            self.provider.base_url = Some(val);
        }

        // Provider-specific API key resolution
        let api_key = env
            .var(constants::ENV_API_KEY)
            .or_else(|_| env.var(self.provider.name.api_key_env_var()))
            .ok();
        if api_key.is_some() {
            self.provider.api_key = api_key;
        }

        // Host settings
        if let Ok(val) = env.var(constants::ENV_HOST_TOKEN) {
            self.host.token = Some(val);
        }
        if let Ok(val) = env.var(constants::ENV_REPOSITORY) {
            self.host.repo = Some(val);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.provider.name, ProviderName::Gemini);
        assert_eq!(config.provider.model, "gemini-2.0-flash");
        assert_eq!(config.review.file_cap, 10);
        assert_eq!(config.review.global_cap, 20);
        assert_eq!(config.host.base_api, "https://api.github.com");
        assert!(config.guidelines.bucket.is_none());
    }

    #[test]
    fn parse_toml_config() {
        let toml_str = r#"
[review]
file_cap = 5
global_cap = 12

[provider]
name = "anthropic"
model = "claude-sonnet-4-20250514"

[host]
repo = "owner/name"

[guidelines]
bucket = "review-train"
prefix = "style/"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.review.file_cap, 5);
        assert_eq!(config.review.global_cap, 12);
        assert_eq!(config.provider.name, ProviderName::Anthropic);
        assert_eq!(config.host.repo.as_deref(), Some("owner/name"));
        assert_eq!(config.guidelines.bucket.as_deref(), Some("review-train"));
        assert_eq!(config.guidelines.prefix, "style/");
    }

    #[test]
    fn merge_prefers_non_default_values() {
        let mut base = Config::default();
        base.review.file_cap = 3;

        let other: Config = toml::from_str("[review]\nglobal_cap = 8\n").unwrap();
        base.merge(other);

        // Untouched by the other layer; keeps the earlier override.
        assert_eq!(base.review.file_cap, 3);
        assert_eq!(base.review.global_cap, 8);
    }

    #[test]
    fn env_overrides_provider_and_host() {
        let mut config = Config::default();
        let env = Env::mock([
            ("REDLINE_PROVIDER", "openai"),
            ("REDLINE_MODEL", "gpt-4o"),
            ("GITHUB_TOKEN", "token123"),
            ("GITHUB_REPOSITORY", "owner/name"),
        ]);
        config.apply_env_vars(&env);

        assert_eq!(config.provider.name, ProviderName::OpenAI);
        assert_eq!(config.provider.model, "gpt-4o");
        assert_eq!(config.host.token.as_deref(), Some("token123"));
        assert_eq!(config.host.repo.as_deref(), Some("owner/name"));
    }

    #[test]
    fn provider_specific_api_key_env_is_consulted() {
        let mut config = Config::default();
        let env = Env::mock([("GEMINI_API_KEY", "gkey")]);
        config.apply_env_vars(&env);
        assert_eq!(config.provider.api_key.as_deref(), Some("gkey"));
    }

    #[test]
    fn generic_api_key_env_wins_over_provider_specific() {
        let mut config = Config::default();
        let env = Env::mock([("REDLINE_API_KEY", "generic"), ("GEMINI_API_KEY", "gkey")]);
        config.apply_env_vars(&env);
        assert_eq!(config.provider.api_key.as_deref(), Some("generic"));
    }

    #[test]
    fn invalid_provider_env_is_ignored() {
        let mut config = Config::default();
        let env = Env::mock([("REDLINE_PROVIDER", "carrier-pigeon")]);
        config.apply_env_vars(&env);
        assert_eq!(config.provider.name, ProviderName::Gemini);
    }

    #[test]
    fn load_reads_local_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(constants::CONFIG_FILENAME),
            "[review]\nfile_cap = 2\n",
        )
        .unwrap();

        let env = Env::mock(Vec::<(&str, &str)>::new());
        let config = Config::load(Some(dir.path()), &env).unwrap();
        assert_eq!(config.review.file_cap, 2);
    }

    #[test]
    fn load_rejects_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(constants::CONFIG_FILENAME), "not [valid").unwrap();

        let env = Env::mock(Vec::<(&str, &str)>::new());
        let result = Config::load(Some(dir.path()), &env);
        assert!(matches!(result, Err(ConfigError::ParseFile { .. })));
    }
}
