//! Line resolution against a file's line index.

use crate::diff::index::LineIndex;
use crate::models::comment::{ReviewComment, UnresolvedReason};

/// Outcome of resolving one comment's line reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The reference maps to this diff position.
    Position(u32),
    /// The reference cannot be anchored in the current file's diff.
    Unresolved(UnresolvedReason),
}

/// Map a comment's line reference to a diff position.
///
/// A comment naming a different file than `current_path` is never
/// resolved here — routing across files is a scheduler-level concern —
/// so the index is not consulted for it.
pub fn resolve(comment: &ReviewComment, current_path: &str, index: &LineIndex) -> Resolution {
    if let Some(ref file) = comment.file {
        if file.trim() != current_path {
            return Resolution::Unresolved(UnresolvedReason::FilenameMismatch);
        }
    }
    match index.position_of(comment.line) {
        Some(position) => Resolution::Position(position),
        None => Resolution::Unresolved(UnresolvedReason::LineNotInDiff),
    }
}
