//! Unified diff hunk parser.
//!
//! Parses the patch of a single file — the hunk-only format hosting
//! services attach to each changed file — into a [`FilePatch`].
//! Parsing is atomic: either every hunk parses or the whole call
//! fails, so a half-read patch never reaches the placement engine.

use crate::models::diff::{DiffLine, DiffLineKind, FilePatch, Hunk};

use super::PatchError;

/// Parse the unified-diff patch of one file.
///
/// The text is expected to start at the first `@@` hunk header, as in
/// the `patch` field of a changed-file payload. Git metadata lines
/// before the first hunk (`diff --git`, `index`, `---`/`+++`) are
/// tolerated and skipped; they carry no diff positions.
///
/// Within hunks, lines beginning `+` are added and `-` removed; every
/// other line — leading-space context, empty lines, and the
/// `\ No newline at end of file` marker — is context. Physical
/// positions run across the whole patch, starting at 1 on the first
/// hunk header and advancing once per line, headers included.
pub fn parse_file_patch(path: &str, input: &str) -> Result<FilePatch, PatchError> {
    let mut hunks: Vec<Hunk> = Vec::new();
    let mut position: u32 = 0;

    let mut lines = input.lines().enumerate().peekable();

    // Skip any preamble before the first hunk header.
    while let Some(&(_, line)) = lines.peek() {
        if line.starts_with("@@") {
            break;
        }
        lines.next();
    }

    while let Some((line_no, header_line)) = lines.next() {
        let (old_start, old_count, new_start, new_count, section) =
            parse_hunk_header(header_line).ok_or_else(|| PatchError::MalformedHunkHeader {
                line: line_no + 1,
                text: header_line.to_string(),
            })?;

        position += 1;
        let header_position = position;

        let mut hunk_lines: Vec<DiffLine> = Vec::new();
        let mut old_line = old_start;
        let mut new_line = new_start;

        while let Some(&(_, next)) = lines.peek() {
            if next.starts_with("@@") {
                break;
            }
            let (_, raw) = lines.next().unwrap();
            position += 1;

            if let Some(content) = raw.strip_prefix('+') {
                hunk_lines.push(DiffLine {
                    kind: DiffLineKind::Added,
                    content: content.to_string(),
                    old_line: None,
                    new_line: Some(new_line),
                    position,
                });
                new_line += 1;
            } else if let Some(content) = raw.strip_prefix('-') {
                hunk_lines.push(DiffLine {
                    kind: DiffLineKind::Removed,
                    content: content.to_string(),
                    old_line: Some(old_line),
                    new_line: None,
                    position,
                });
                old_line += 1;
            } else {
                // Context: leading-space lines, empty lines, and the
                // "\ No newline at end of file" marker.
                let content = raw.strip_prefix(' ').unwrap_or(raw).to_string();
                hunk_lines.push(DiffLine {
                    kind: DiffLineKind::Context,
                    content,
                    old_line: Some(old_line),
                    new_line: Some(new_line),
                    position,
                });
                old_line += 1;
                new_line += 1;
            }
        }

        hunks.push(Hunk {
            old_start,
            old_count,
            new_start,
            new_count,
            section,
            header_position,
            lines: hunk_lines,
        });
    }

    if hunks.is_empty() {
        return Err(PatchError::Empty);
    }

    Ok(FilePatch {
        path: path.to_string(),
        hunks,
    })
}

/// Parse a `@@ -old_start,old_count +new_start,new_count @@ section` line.
fn parse_hunk_header(line: &str) -> Option<(u32, u32, u32, u32, Option<String>)> {
    let rest = line.strip_prefix("@@ ")?;
    let end = rest.find(" @@")?;
    let range_part = &rest[..end];
    let section = {
        let tail = &rest[end + 3..];
        if tail.trim().is_empty() {
            None
        } else {
            Some(tail.trim().to_string())
        }
    };

    let parts: Vec<&str> = range_part.split(' ').collect();
    if parts.len() != 2 {
        return None;
    }

    let (old_start, old_count) = parse_range(parts[0].strip_prefix('-')?)?;
    let (new_start, new_count) = parse_range(parts[1].strip_prefix('+')?)?;

    Some((old_start, old_count, new_start, new_count, section))
}

/// Parse "start,count" or "start" (count defaults to 1).
fn parse_range(s: &str) -> Option<(u32, u32)> {
    if let Some((start, count)) = s.split_once(',') {
        Some((start.parse().ok()?, count.parse().ok()?))
    } else {
        Some((s.parse().ok()?, 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_PATCH: &str = "@@ -1,5 +1,6 @@\n fn main() {\n-    println!(\"Hello\");\n+    println!(\"Hello, world!\");\n+    println!(\"Goodbye!\");\n     let x = 42;\n }\n";

    #[test]
    fn parse_simple_patch() {
        let patch = parse_file_patch("src/main.rs", SAMPLE_PATCH).unwrap();
        assert_eq!(patch.path, "src/main.rs");
        assert_eq!(patch.hunks.len(), 1);

        let hunk = &patch.hunks[0];
        assert_eq!(hunk.old_start, 1);
        assert_eq!(hunk.old_count, 5);
        assert_eq!(hunk.new_start, 1);
        assert_eq!(hunk.new_count, 6);
        // 1 context + 1 removed + 2 added + 1 context + 1 context = 6 lines
        assert_eq!(hunk.lines.len(), 6);
        assert_eq!(patch.added_lines(), 2);
        assert_eq!(patch.removed_lines(), 1);
    }

    #[test]
    fn line_numbers_are_correct() {
        let patch = parse_file_patch("src/main.rs", SAMPLE_PATCH).unwrap();
        let hunk = &patch.hunks[0];

        // Context line: " fn main() {"
        assert_eq!(hunk.lines[0].old_line, Some(1));
        assert_eq!(hunk.lines[0].new_line, Some(1));

        // Removed: "-    println!(\"Hello\");"
        assert_eq!(hunk.lines[1].old_line, Some(2));
        assert_eq!(hunk.lines[1].new_line, None);

        // Added: "+    println!(\"Hello, world!\");"
        assert_eq!(hunk.lines[2].old_line, None);
        assert_eq!(hunk.lines[2].new_line, Some(2));
    }

    #[test]
    fn positions_count_every_physical_line() {
        let patch = parse_file_patch("src/main.rs", SAMPLE_PATCH).unwrap();
        let hunk = &patch.hunks[0];

        assert_eq!(hunk.header_position, 1);
        let positions: Vec<u32> = hunk.lines.iter().map(|l| l.position).collect();
        assert_eq!(positions, vec![2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn positions_run_across_hunks() {
        let input = "@@ -1,2 +1,2 @@\n a\n-b\n+B\n@@ -10,2 +10,3 @@\n c\n+d\n e\n";
        let patch = parse_file_patch("f.rs", input).unwrap();
        assert_eq!(patch.hunks.len(), 2);

        // First hunk: header 1, lines 2-4. Second: header 5, lines 6-8.
        assert_eq!(patch.hunks[0].header_position, 1);
        assert_eq!(patch.hunks[1].header_position, 5);
        let second: Vec<u32> = patch.hunks[1].lines.iter().map(|l| l.position).collect();
        assert_eq!(second, vec![6, 7, 8]);
    }

    #[test]
    fn second_hunk_restarts_new_line_numbering() {
        let input = "@@ -1,2 +1,2 @@\n a\n-b\n+B\n@@ -10,2 +20,2 @@\n c\n+d\n";
        let patch = parse_file_patch("f.rs", input).unwrap();
        let second = &patch.hunks[1];
        assert_eq!(second.lines[0].new_line, Some(20));
        assert_eq!(second.lines[1].new_line, Some(21));
    }

    #[test]
    fn counts_default_to_one() {
        let patch = parse_file_patch("f.rs", "@@ -3 +4 @@\n-old\n+new\n").unwrap();
        let hunk = &patch.hunks[0];
        assert_eq!(hunk.old_start, 3);
        assert_eq!(hunk.old_count, 1);
        assert_eq!(hunk.new_start, 4);
        assert_eq!(hunk.new_count, 1);
    }

    #[test]
    fn header_section_text_is_kept() {
        let patch =
            parse_file_patch("lib.rs", "@@ -10,3 +10,4 @@ fn some_function() {\n     let x = 1;\n+    let y = 2;\n     let z = 3;\n }").unwrap();
        assert_eq!(
            patch.hunks[0].section.as_deref(),
            Some("fn some_function() {")
        );
    }

    #[test]
    fn git_preamble_is_skipped() {
        let input = "diff --git a/f.rs b/f.rs\nindex 1234567..abcdefg 100644\n--- a/f.rs\n+++ b/f.rs\n@@ -1,1 +1,1 @@\n-old\n+new\n";
        let patch = parse_file_patch("f.rs", input).unwrap();
        assert_eq!(patch.hunks.len(), 1);
        // The preamble carries no positions; the header is still line 1.
        assert_eq!(patch.hunks[0].header_position, 1);
    }

    #[test]
    fn malformed_header_fails_whole_patch() {
        let input = "@@ -1,1 +1,1 @@\n-old\n+new\n@@ broken @@\n+more\n";
        let err = parse_file_patch("f.rs", input).unwrap_err();
        assert_eq!(
            err,
            PatchError::MalformedHunkHeader {
                line: 4,
                text: "@@ broken @@".to_string(),
            }
        );
    }

    #[test]
    fn non_numeric_header_fields_fail() {
        let err = parse_file_patch("f.rs", "@@ -a,1 +1,1 @@\n+x\n").unwrap_err();
        assert!(matches!(err, PatchError::MalformedHunkHeader { line: 1, .. }));
    }

    #[test]
    fn missing_terminator_fails() {
        let err = parse_file_patch("f.rs", "@@ -1,1 +1,1\n+x\n").unwrap_err();
        assert!(matches!(err, PatchError::MalformedHunkHeader { .. }));
    }

    #[test]
    fn empty_input_is_an_error() {
        assert_eq!(parse_file_patch("f.rs", "").unwrap_err(), PatchError::Empty);
        assert_eq!(
            parse_file_patch("f.rs", "no hunks here\n").unwrap_err(),
            PatchError::Empty
        );
    }

    #[test]
    fn empty_lines_and_no_newline_marker_are_context() {
        let input = "@@ -1,3 +1,4 @@\n fn a() {\n\n+    new_line();\n }\n\\ No newline at end of file\n";
        let patch = parse_file_patch("f.rs", input).unwrap();
        let hunk = &patch.hunks[0];

        assert_eq!(hunk.lines.len(), 5);
        assert_eq!(hunk.lines[1].kind, DiffLineKind::Context);
        assert_eq!(hunk.lines[1].content, "");
        assert_eq!(hunk.lines[4].kind, DiffLineKind::Context);
        // The marker still occupies a physical position.
        assert_eq!(hunk.lines[4].position, 6);
    }

    #[test]
    fn removed_only_hunk() {
        let patch = parse_file_patch("f.rs", "@@ -1,2 +0,0 @@\n-gone\n-also gone\n").unwrap();
        let hunk = &patch.hunks[0];
        assert_eq!(hunk.lines.len(), 2);
        assert!(hunk.lines.iter().all(|l| l.kind == DiffLineKind::Removed));
        assert!(hunk.lines.iter().all(|l| l.new_line.is_none()));
    }
}
