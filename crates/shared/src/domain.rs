use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use uuid::Uuid;

use crate::error::SubmissionFailure;

pub const UPLOAD_LABEL_PREFIX: &str = "Uploaded file: ";
pub const EXTRACTED_DATA_ANSWER: &str = "Extracted Data:";

/// Upload types the file picker offers. Not enforced on submit.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["pdf", "jpg", "jpeg", "png"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TurnId(pub Uuid);

impl TurnId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TurnId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionKind {
    Text,
    File,
}

/// A document chosen for upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHandle {
    pub name: String,
    pub path: PathBuf,
}

impl FileHandle {
    /// Returns `None` when the path has no final component to use as a name.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();
        let name = path.file_name()?.to_string_lossy().into_owned();
        Some(Self {
            name,
            path: path.to_path_buf(),
        })
    }

    pub fn has_accepted_extension(&self) -> bool {
        self.path
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
            .is_some_and(|ext| ACCEPTED_EXTENSIONS.contains(&ext.as_str()))
    }
}

/// The two interaction kinds that produce a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Text { query: String },
    File(FileHandle),
}

impl Submission {
    pub fn text(query: impl Into<String>) -> Self {
        Self::Text {
            query: query.into(),
        }
    }

    pub fn kind(&self) -> SubmissionKind {
        match self {
            Self::Text { .. } => SubmissionKind::Text,
            Self::File(_) => SubmissionKind::File,
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::Text { query } => query.clone(),
            Self::File(file) => format!("{UPLOAD_LABEL_PREFIX}{}", file.name),
        }
    }
}

/// Normalized result attached to a turn.
///
/// Every recognized field is optional and a JSON `null` reads as absent.
/// Fields the client does not recognize are kept in `extra` so the stored
/// turn carries the full endpoint body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entities: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverage: Option<Vec<Value>>,
    #[serde(
        default,
        rename = "extractedFields",
        alias = "extracted_fields",
        skip_serializing_if = "Option::is_none"
    )]
    pub extracted_fields: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_text: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Response {
    pub fn with_answer(answer: impl Into<String>) -> Self {
        Self {
            answer: Some(answer.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "failure", rename_all = "snake_case")]
pub enum TurnStatus {
    Completed,
    Failed(SubmissionFailure),
}

/// One completed exchange. Fields are read-only once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    id: TurnId,
    label: String,
    kind: SubmissionKind,
    status: TurnStatus,
    response: Response,
    completed_at: DateTime<Utc>,
}

impl Turn {
    pub fn completed(label: impl Into<String>, kind: SubmissionKind, response: Response) -> Self {
        Self {
            id: TurnId::new(),
            label: label.into(),
            kind,
            status: TurnStatus::Completed,
            response,
            completed_at: Utc::now(),
        }
    }

    pub fn failed(label: impl Into<String>, kind: SubmissionKind, failure: SubmissionFailure) -> Self {
        let response = Response::with_answer(format!("Request failed: {}", failure.message));
        Self {
            id: TurnId::new(),
            label: label.into(),
            kind,
            status: TurnStatus::Failed(failure),
            response,
            completed_at: Utc::now(),
        }
    }

    pub fn id(&self) -> TurnId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> SubmissionKind {
        self.kind
    }

    pub fn status(&self) -> &TurnStatus {
        &self.status
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, TurnStatus::Failed(_))
    }

    pub fn response(&self) -> &Response {
        &self.response
    }

    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use serde_json::json;

    #[test]
    fn labels_follow_submission_kind() {
        assert_eq!(
            Submission::text("What does my plan cover?").label(),
            "What does my plan cover?"
        );
        let file = FileHandle::from_path("/tmp/docs/policy.pdf").expect("file name");
        assert_eq!(Submission::File(file).label(), "Uploaded file: policy.pdf");
    }

    #[test]
    fn accepted_extension_is_case_insensitive() {
        let scan = FileHandle::from_path("card.JPG").expect("file name");
        let sheet = FileHandle::from_path("plan.xlsx").expect("file name");
        assert!(scan.has_accepted_extension());
        assert!(!sheet.has_accepted_extension());
    }

    #[test]
    fn response_treats_null_as_absent_and_keeps_extras() {
        let response: Response = serde_json::from_value(json!({
            "answer": null,
            "confidence": 1.0,
            "coverage": null,
            "patient_info": {"age": 40}
        }))
        .expect("deserialize");

        assert!(response.answer.is_none());
        assert!(response.coverage.is_none());
        assert_eq!(response.confidence.map(|n| n.to_string()), Some("1.0".into()));
        assert_eq!(response.extra.get("patient_info"), Some(&json!({"age": 40})));
    }

    #[test]
    fn failed_turn_answer_communicates_failure() {
        let turn = Turn::failed(
            "hello",
            SubmissionKind::Text,
            SubmissionFailure::new(FailureKind::Transport, "connection refused"),
        );
        assert!(turn.is_failed());
        assert_eq!(
            turn.response().answer.as_deref(),
            Some("Request failed: connection refused")
        );
    }
}
