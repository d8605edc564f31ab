//! Diff-related types: per-file patches, hunks, and diff lines.

use serde::{Deserialize, Serialize};

/// The kind of a line in a diff hunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiffLineKind {
    /// Line exists only in the new version (added).
    Added,
    /// Line exists only in the old version (removed).
    Removed,
    /// Line is unchanged (context).
    Context,
}

/// A single line in a diff hunk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffLine {
    /// The kind of change.
    pub kind: DiffLineKind,
    /// The content of the line (without the leading +/-/space marker).
    pub content: String,
    /// Line number in the old file (None for added lines).
    pub old_line: Option<u32>,
    /// Line number in the new file (None for removed lines).
    pub new_line: Option<u32>,
    /// Ordinal of this physical line within the serialized patch,
    /// counting hunk headers. Inline-comment APIs anchor to this value
    /// rather than to a file line number.
    pub position: u32,
}

/// A contiguous hunk within a file patch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hunk {
    /// Starting line in the old file.
    pub old_start: u32,
    /// Number of lines in the old file (defaults to 1 in the header).
    pub old_count: u32,
    /// Starting line in the new file.
    pub new_start: u32,
    /// Number of lines in the new file (defaults to 1 in the header).
    pub new_count: u32,
    /// Optional trailing header text (e.g. enclosing function name).
    pub section: Option<String>,
    /// Diff position of the `@@` header line itself.
    pub header_position: u32,
    /// The lines in this hunk.
    pub lines: Vec<DiffLine>,
}

/// The parsed patch of a single file.
///
/// Hunks are ordered by ascending new-file start line and do not
/// overlap; the physical line positions run continuously across them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilePatch {
    /// Repo-relative path the patch applies to.
    pub path: String,
    /// The hunks in this patch.
    pub hunks: Vec<Hunk>,
}

impl FilePatch {
    /// Total number of added lines across all hunks.
    pub fn added_lines(&self) -> usize {
        self.hunks
            .iter()
            .flat_map(|h| &h.lines)
            .filter(|l| l.kind == DiffLineKind::Added)
            .count()
    }

    /// Total number of removed lines across all hunks.
    pub fn removed_lines(&self) -> usize {
        self.hunks
            .iter()
            .flat_map(|h| &h.lines)
            .filter(|l| l.kind == DiffLineKind::Removed)
            .count()
    }
}
