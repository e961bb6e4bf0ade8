//! Pure projection from responses and turns to display structure.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use shared::domain::{Response, SubmissionKind, Turn, TurnId};

use crate::transcript::TranscriptStore;

pub const ENTITIES_SUMMARY: &str = "Entities";
pub const RECOMMENDATIONS_SUMMARY: &str = "Recommendations";
pub const COVERAGE_SUMMARY: &str = "Coverage";
pub const RAW_TEXT_SUMMARY: &str = "Extracted Text (Raw JSON)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldLine {
    pub key: String,
    pub value: String,
}

/// One slot of a rendered response, in fixed display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayNode {
    Answer(String),
    /// Verbatim wire text of the number.
    Confidence(String),
    /// Pretty-printed JSON, shown collapsed.
    Entities(String),
    Recommendations(Vec<String>),
    /// Pretty-printed JSON, shown collapsed.
    Coverage(String),
    ExtractedFields(Vec<FieldLine>),
    /// Shown collapsed.
    RawText(String),
}

impl DisplayNode {
    pub fn summary(&self) -> Option<&'static str> {
        match self {
            Self::Entities(_) => Some(ENTITIES_SUMMARY),
            Self::Recommendations(_) => Some(RECOMMENDATIONS_SUMMARY),
            Self::Coverage(_) => Some(COVERAGE_SUMMARY),
            Self::RawText(_) => Some(RAW_TEXT_SUMMARY),
            Self::Answer(_) | Self::Confidence(_) | Self::ExtractedFields(_) => None,
        }
    }

    pub fn is_collapsible(&self) -> bool {
        matches!(
            self,
            Self::Entities(_) | Self::Coverage(_) | Self::RawText(_)
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayTree {
    pub nodes: Vec<DisplayNode>,
}

impl DisplayTree {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnView {
    pub id: TurnId,
    pub label: String,
    pub kind: SubmissionKind,
    pub failed: bool,
    pub completed_at: DateTime<Utc>,
    pub body: DisplayTree,
}

pub fn render(response: &Response) -> DisplayTree {
    let mut nodes = Vec::new();

    if let Some(answer) = &response.answer {
        nodes.push(DisplayNode::Answer(answer.clone()));
    }

    if let Some(confidence) = &response.confidence {
        nodes.push(DisplayNode::Confidence(confidence.to_string()));
    }

    if let Some(entities) = response.entities.as_ref().filter(|map| !map.is_empty()) {
        nodes.push(DisplayNode::Entities(pretty(&Value::Object(entities.clone()))));
    }

    if let Some(items) = response
        .recommendations
        .as_ref()
        .filter(|items| !items.is_empty())
    {
        nodes.push(DisplayNode::Recommendations(
            items.iter().map(display_text).collect(),
        ));
    }

    if let Some(coverage) = response.coverage.as_ref().filter(|items| !items.is_empty()) {
        nodes.push(DisplayNode::Coverage(pretty(&Value::Array(coverage.clone()))));
    }

    if let Some(Value::Object(fields)) = &response.extracted_fields {
        if !fields.is_empty() {
            nodes.push(DisplayNode::ExtractedFields(field_lines(fields)));
        }
    }

    if let Some(raw) = response.extracted_text.as_ref().filter(|raw| !raw.is_empty()) {
        nodes.push(DisplayNode::RawText(raw.clone()));
    }

    DisplayTree { nodes }
}

pub fn render_turn(turn: &Turn) -> TurnView {
    TurnView {
        id: turn.id(),
        label: turn.label().to_string(),
        kind: turn.kind(),
        failed: turn.is_failed(),
        completed_at: turn.completed_at(),
        body: render(turn.response()),
    }
}

pub fn render_transcript(store: &TranscriptStore) -> Vec<TurnView> {
    store.all().iter().map(render_turn).collect()
}

/// Strings show unquoted; every other value shows as compact JSON.
pub fn display_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => canonical(other).to_string(),
    }
}

fn field_lines(fields: &Map<String, Value>) -> Vec<FieldLine> {
    let mut lines: Vec<FieldLine> = fields
        .iter()
        .map(|(key, value)| FieldLine {
            key: key.clone(),
            value: display_text(value),
        })
        .collect();
    lines.sort_by(|a, b| a.key.cmp(&b.key));
    lines
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(&canonical(value)).unwrap_or_else(|_| value.to_string())
}

/// Rebuilds objects with keys in sorted order at every depth.
fn canonical(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key.clone(), canonical(value)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(canonical).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
