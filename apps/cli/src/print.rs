use std::fmt::Write as _;

use chrono::Local;
use client_core::{DisplayNode, TurnView};

const INDENT: &str = "    ";

/// Renders one turn as terminal text. Collapsible blocks show only their
/// summary unless `expanded` is set.
pub fn format_turn(number: usize, view: &TurnView, expanded: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "[{number}] You: {}", view.label);

    let marker = if view.failed { "AI (error):" } else { "AI:" };
    let mut nodes = view.body.nodes.as_slice();
    if let Some((DisplayNode::Answer(answer), rest)) = nodes.split_first() {
        let _ = writeln!(out, "{marker} {answer}");
        nodes = rest;
    } else {
        let _ = writeln!(out, "{marker}");
    }

    for node in nodes {
        match node {
            DisplayNode::Answer(answer) => {
                let _ = writeln!(out, "  {answer}");
            }
            DisplayNode::Confidence(confidence) => {
                let _ = writeln!(out, "  Confidence: {confidence}");
            }
            DisplayNode::Recommendations(items) => {
                let _ = writeln!(out, "  Recommendations:");
                for (index, item) in items.iter().enumerate() {
                    let _ = writeln!(out, "{INDENT}{}. {item}", index + 1);
                }
            }
            DisplayNode::ExtractedFields(lines) => {
                for line in lines {
                    let _ = writeln!(out, "  {}: {}", line.key, line.value);
                }
            }
            DisplayNode::Entities(body) | DisplayNode::Coverage(body) | DisplayNode::RawText(body) => {
                let summary = node.summary().unwrap_or_default();
                if expanded {
                    let _ = writeln!(out, "  ▾ {summary}");
                    for line in body.lines() {
                        let _ = writeln!(out, "{INDENT}{line}");
                    }
                } else {
                    let _ = writeln!(out, "  ▸ {summary} (/expand {number})");
                }
            }
        }
    }

    out
}

pub fn format_history(views: &[TurnView]) -> String {
    if views.is_empty() {
        return "No turns yet.\n".to_string();
    }
    let mut out = String::new();
    for (index, view) in views.iter().enumerate() {
        let status = if view.failed { " (failed)" } else { "" };
        let _ = writeln!(
            out,
            "{:>3}. {} {}{status}",
            index + 1,
            view.completed_at.with_timezone(&Local).format("%H:%M:%S"),
            view.label
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    use client_core::render_turn;
    use serde_json::json;
    use shared::{
        domain::{Response, SubmissionKind, Turn},
        error::{FailureKind, SubmissionFailure},
    };

    fn upload_turn() -> Turn {
        let response: Response = serde_json::from_value(json!({
            "answer": "Extracted Data:",
            "extractedFields": {"insurer": "Acme"},
            "extracted_text": "{\n  \"insurer\": \"Acme\"\n}"
        }))
        .expect("response");
        Turn::completed("Uploaded file: policy.pdf", SubmissionKind::File, response)
    }

    #[test]
    fn collapsed_blocks_show_only_their_summary() {
        let text = format_turn(1, &render_turn(&upload_turn()), false);
        assert_eq!(
            text,
            "[1] You: Uploaded file: policy.pdf\n\
             AI: Extracted Data:\n  \
             insurer: Acme\n  \
             ▸ Extracted Text (Raw JSON) (/expand 1)\n"
        );
    }

    #[test]
    fn expanded_blocks_show_their_body() {
        let text = format_turn(3, &render_turn(&upload_turn()), true);
        assert!(text.contains("▾ Extracted Text (Raw JSON)\n    {\n      \"insurer\": \"Acme\"\n    }\n"));
    }

    #[test]
    fn answer_confidence_and_recommendations() {
        let response: Response = serde_json::from_value(json!({
            "answer": "Suggested drugs for 'headache': ibuprofen",
            "confidence": 0.87,
            "recommendations": ["ibuprofen", "rest"]
        }))
        .expect("response");
        let turn = Turn::completed("drug for headache", SubmissionKind::Text, response);

        let text = format_turn(2, &render_turn(&turn), false);
        assert_eq!(
            text,
            "[2] You: drug for headache\n\
             AI: Suggested drugs for 'headache': ibuprofen\n  \
             Confidence: 0.87\n  \
             Recommendations:\n    \
             1. ibuprofen\n    \
             2. rest\n"
        );
    }

    #[test]
    fn failed_turns_are_marked() {
        let turn = Turn::failed(
            "hello",
            SubmissionKind::Text,
            SubmissionFailure::new(FailureKind::Transport, "connection refused"),
        );
        let views = [render_turn(&turn)];

        let text = format_turn(1, &views[0], false);
        assert!(text.contains("AI (error): Request failed: connection refused"));
        assert!(format_history(&views).contains("hello (failed)"));
    }

    #[test]
    fn history_times_are_local() {
        let view = render_turn(&upload_turn());
        let expected = format!(
            "  1. {} Uploaded file: policy.pdf\n",
            view.completed_at.with_timezone(&Local).format("%H:%M:%S")
        );
        assert_eq!(format_history(&[view]), expected);
    }

    #[test]
    fn empty_history_says_so() {
        assert_eq!(format_history(&[]), "No turns yet.\n");
    }
}
