//! Terminal run summary: styled flowing text grouped by file.

use colored::Colorize;

use crate::models::comment::{PlacementDecision, SkipReason, UnresolvedReason};
use crate::pipeline::{FileReport, RunSummary};

/// Render the run summary for terminal output.
pub fn render(summary: &RunSummary) -> String {
    let mut output = String::new();

    for file in &summary.files {
        match file {
            FileReport::Reviewed {
                path,
                added,
                removed,
                outcomes,
            } => {
                output.push_str(&format!(
                    " {} {} {}\n",
                    "✔".green().bold(),
                    path.bold(),
                    format!("(+{added} -{removed})").dimmed()
                ));
                for outcome in outcomes {
                    output.push_str(&render_outcome(outcome));
                    output.push('\n');
                }
            }
            FileReport::NoFeedback { path } => {
                output.push_str(&format!(
                    " {} {} {}\n",
                    "✔".green().bold(),
                    path.bold(),
                    "no actionable feedback".dimmed()
                ));
            }
            FileReport::GenerationFailed { path, error } => {
                output.push_str(&format!(
                    " {} {} {}\n",
                    "✖".red().bold(),
                    path.bold(),
                    format!("generation failed: {error}").red()
                ));
            }
            FileReport::ParseFailed { path, error, noted } => {
                let note_state = if *noted {
                    "explained with an issue note"
                } else {
                    "issue note could not be posted"
                };
                output.push_str(&format!(
                    " {} {} {}\n",
                    "✖".red().bold(),
                    path.bold(),
                    format!("{error} — {note_state}").red()
                ));
            }
        }
    }

    output.push_str(&format!(
        "{}\n",
        "───────────────────────────────────".dimmed()
    ));
    output.push_str(&format!(
        " {} inline {} posted, {} fallback {}, {} skipped\n",
        summary.posted().to_string().bold(),
        if summary.posted() == 1 {
            "comment"
        } else {
            "comments"
        },
        summary.fallbacks().to_string().yellow().bold(),
        if summary.fallbacks() == 1 {
            "note"
        } else {
            "notes"
        },
        summary.skipped().to_string().dimmed(),
    ));

    output
}

fn render_outcome(outcome: &crate::placement::PlacementOutcome) -> String {
    let line = outcome.comment.line;
    match outcome.decision {
        PlacementDecision::Resolved { position } if outcome.delivered => format!(
            "   {} line {line} {} diff position {position}",
            "●".green(),
            "→".dimmed()
        ),
        PlacementDecision::Resolved { position } => format!(
            "   {} line {line} {} diff position {position} {}",
            "✖".red(),
            "→".dimmed(),
            "(post failed)".red()
        ),
        PlacementDecision::Unresolved { reason } => format!(
            "   {} line {line} {}",
            "↪".yellow(),
            unresolved_label(reason).yellow()
        ),
        PlacementDecision::Skipped { reason } => format!(
            "   {} line {line} {}",
            "−".dimmed(),
            skip_label(reason).dimmed()
        ),
    }
}

fn unresolved_label(reason: UnresolvedReason) -> &'static str {
    match reason {
        UnresolvedReason::LineNotInDiff => "not in diff, fell back to issue note",
        UnresolvedReason::FilenameMismatch => "names another file, fell back to issue note",
    }
}

fn skip_label(reason: SkipReason) -> &'static str {
    match reason {
        SkipReason::CapReached => "skipped: cap reached",
        SkipReason::Duplicate => "skipped: duplicate",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::comment::ReviewComment;
    use crate::placement::PlacementOutcome;

    fn outcome(decision: PlacementDecision, delivered: bool) -> PlacementOutcome {
        PlacementOutcome {
            comment: ReviewComment {
                file: None,
                line: 11,
                body: "consider renaming this field".to_string(),
            },
            decision,
            delivered,
        }
    }

    #[test]
    fn render_reviewed_file() {
        let summary = RunSummary {
            files: vec![FileReport::Reviewed {
                path: "src/api.rs".to_string(),
                added: 2,
                removed: 1,
                outcomes: vec![
                    outcome(PlacementDecision::Resolved { position: 3 }, true),
                    outcome(
                        PlacementDecision::Unresolved {
                            reason: UnresolvedReason::LineNotInDiff,
                        },
                        true,
                    ),
                ],
            }],
        };
        let text = render(&summary);
        assert!(text.contains("src/api.rs"));
        assert!(text.contains("diff position 3"));
        assert!(text.contains("not in diff"));
        assert!(text.contains("1 inline comment posted"));
        assert!(text.contains("1 fallback note"));
    }

    #[test]
    fn render_no_feedback_and_failures() {
        let summary = RunSummary {
            files: vec![
                FileReport::NoFeedback {
                    path: "a.rs".to_string(),
                },
                FileReport::GenerationFailed {
                    path: "b.rs".to_string(),
                    error: "timed out".to_string(),
                },
                FileReport::ParseFailed {
                    path: "c.rs".to_string(),
                    error: crate::diff::PatchError::Empty,
                    noted: true,
                },
            ],
        };
        let text = render(&summary);
        assert!(text.contains("no actionable feedback"));
        assert!(text.contains("generation failed: timed out"));
        assert!(text.contains("explained with an issue note"));
        assert!(text.contains("0 inline comments posted"));
    }
}
