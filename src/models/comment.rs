//! Extracted review comments and their placement decisions.

use serde::{Deserialize, Serialize};

/// A single line-anchored comment extracted from generated review text.
///
/// Immutable once extracted. `line` refers to a line number in the new
/// version of the file under review, which is the convention the
/// generator is prompted to produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewComment {
    /// Explicit file reference, when the generator named one. Absent
    /// means "the file under review".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Referenced line number in the new version of the file.
    pub line: u32,
    /// Comment text.
    pub body: String,
}

/// Why a line reference could not be mapped to a diff position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedReason {
    /// The referenced line is not among the diff's commentable lines.
    LineNotInDiff,
    /// The comment names a different file than the one under review.
    FilenameMismatch,
}

/// Why a comment was dropped without attempting resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The per-file or run-wide comment cap was already reached.
    CapReached,
    /// An identical comment was already placed for this file.
    Duplicate,
}

/// The placement verdict for one extracted comment.
///
/// Produced by the annotation scheduler and never mutated afterwards;
/// tests assert on these values rather than on posting side effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlacementDecision {
    /// Anchored to a diff position; an inline comment was attempted.
    Resolved { position: u32 },
    /// Could not be anchored; routed to the issue-level fallback.
    Unresolved { reason: UnresolvedReason },
    /// Dropped before resolution.
    Skipped { reason: SkipReason },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decision_serializes_with_kind_tag() {
        let decision = PlacementDecision::Resolved { position: 7 };
        let json = serde_json::to_string(&decision).unwrap();
        assert_eq!(json, r#"{"kind":"resolved","position":7}"#);

        let decision = PlacementDecision::Skipped {
            reason: SkipReason::CapReached,
        };
        let json = serde_json::to_string(&decision).unwrap();
        assert_eq!(json, r#"{"kind":"skipped","reason":"cap_reached"}"#);
    }

    #[test]
    fn comment_omits_absent_file() {
        let comment = ReviewComment {
            file: None,
            line: 12,
            body: "consider renaming this field".into(),
        };
        let json = serde_json::to_string(&comment).unwrap();
        assert!(!json.contains("file"));
    }
}
