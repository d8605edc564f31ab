//! Comment extraction from generated review text.
//!
//! One grammar, applied per line of the response:
//!
//! ```text
//! [file: <name>,] line <digits>: <body>
//! ```
//!
//! The `line` keyword is case-insensitive. Lines that do not match are
//! ignored — free prose and code fences around the annotations are
//! expected — and zero matches means "no actionable feedback", not an
//! error.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::comment::ReviewComment;

static COMMENT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(?:file:\s*(?P<file>[^,]+?)\s*,\s*)?line\s+(?P<line>[0-9]+)\s*:\s*(?P<body>.*)$",
    )
    .expect("comment grammar regex is valid")
});

/// Extract line-anchored comments from generated review text.
///
/// The returned order matches order of appearance in the response, and
/// the function is pure: running it twice on the same text yields an
/// identical sequence.
pub fn extract_comments(text: &str) -> Vec<ReviewComment> {
    let mut comments = Vec::new();

    for raw in text.lines() {
        let Some(caps) = COMMENT_LINE.captures(raw) else {
            continue;
        };
        // A number too large for u32 is a hallucination; treat the
        // line as non-matching rather than failing the batch.
        let Ok(line) = caps["line"].parse::<u32>() else {
            continue;
        };
        comments.push(ReviewComment {
            file: caps.name("file").map(|m| m.as_str().trim().to_string()),
            line,
            body: caps["body"].trim().to_string(),
        });
    }

    comments
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn extracts_single_comment() {
        let comments = extract_comments("line 11: consider renaming this field");
        assert_eq!(
            comments,
            vec![ReviewComment {
                file: None,
                line: 11,
                body: "consider renaming this field".to_string(),
            }]
        );
    }

    #[test]
    fn extracts_in_order_of_appearance() {
        let text = "line 30: second thing comes later\nline 2: first thing\n";
        let comments = extract_comments(text);
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].line, 30);
        assert_eq!(comments[1].line, 2);
    }

    #[test]
    fn keyword_is_case_insensitive() {
        let comments = extract_comments("Line 5: capitalized keyword\nLINE 6: shouted keyword");
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].line, 5);
        assert_eq!(comments[1].line, 6);
    }

    #[test]
    fn file_prefix_is_captured() {
        let comments = extract_comments("file: pkg/api/types.go, line 42: missing validation");
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].file.as_deref(), Some("pkg/api/types.go"));
        assert_eq!(comments[0].line, 42);
        assert_eq!(comments[0].body, "missing validation");
    }

    #[test]
    fn prose_and_fences_are_ignored() {
        let text = "Here is my review:\n```\nline 3: drop the unwrap\n```\nThanks!\n";
        let comments = extract_comments(text);
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].line, 3);
        assert_eq!(comments[0].body, "drop the unwrap");
    }

    #[test]
    fn no_matches_yield_empty_sequence() {
        assert!(extract_comments("Looks good to me!\n").is_empty());
        assert!(extract_comments("").is_empty());
        // Mentioning lines without the delimiter does not match.
        assert!(extract_comments("see line 12 for details\n").is_empty());
    }

    #[test]
    fn oversized_line_number_is_ignored() {
        let comments = extract_comments("line 99999999999999999999: never happens");
        assert!(comments.is_empty());
    }

    #[test]
    fn body_is_trimmed_but_may_be_empty() {
        let comments = extract_comments("line 7:    spaced out   ");
        assert_eq!(comments[0].body, "spaced out");

        let comments = extract_comments("line 8:");
        assert_eq!(comments[0].body, "");
    }

    #[test]
    fn extraction_is_idempotent() {
        let text = "line 1: a\nnoise\nfile: x.rs, line 2: b\n";
        assert_eq!(extract_comments(text), extract_comments(text));
    }
}
