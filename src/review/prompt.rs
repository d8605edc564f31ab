//! Prompt assembly for the review generator.

use crate::constants::TRUNCATION_MARKER;

/// Cut diff text at `max_chars` characters, appending an explicit
/// truncation marker so the generator knows the tail is missing.
pub fn truncate_diff(diff: &str, max_chars: usize) -> String {
    if diff.chars().count() <= max_chars {
        return diff.to_string();
    }
    let cut: String = diff.chars().take(max_chars).collect();
    format!("{cut}{TRUNCATION_MARKER}")
}

/// Build the user prompt for one file's review.
///
/// The format block pins the output grammar the extractor understands.
/// Line numbers are post-image (new file) numbers — the one convention
/// that stays stable no matter where in the diff a line was added.
pub fn build_prompt(file_path: &str, diff: &str, guidelines: &str, history: &str) -> String {
    let mut prompt = String::new();

    if !guidelines.trim().is_empty() {
        prompt.push_str("## Review Guidelines\n\n");
        prompt.push_str(guidelines.trim_end());
        prompt.push_str("\n\n");
    }

    if !history.trim().is_empty() {
        prompt.push_str("## Prior Review Discussion\n\n");
        prompt.push_str(history.trim_end());
        prompt.push_str("\n\n");
    }

    prompt.push_str(&format!(
        "## Diff for: {file_path}\n\n```diff\n{diff}\n```\n\n"
    ));

    prompt.push_str(&format!(
        "## Instructions\n\n\
        Review the diff above from `{file_path}`. Identify potential bugs \
        and suggest concrete improvements. Avoid comments that merely \
        acknowledge correct code or good practices.\n\n\
        Provide each comment on its own line, in exactly this format:\n\n\
        ```\n\
        line <line_number>: <comment>\n\
        ```\n\n\
        `<line_number>` is the line's number in the new version of \
        `{file_path}`, not an offset within the diff. Comment only on \
        added or unchanged lines that appear in the diff. If there is \
        nothing worth raising, respond without any `line` entries.\n"
    ));

    prompt
}
