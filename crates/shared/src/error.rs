use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The endpoint could not be reached, or the call timed out.
    Transport,
    /// The endpoint answered with a non-success status.
    Status,
    /// The body was not a JSON object of the expected shape.
    MalformedBody,
    /// The chosen document could not be read before upload.
    LocalFile,
}

impl FailureKind {
    pub fn describe(self) -> &'static str {
        match self {
            Self::Transport => "service unreachable",
            Self::Status => "service error",
            Self::MalformedBody => "unexpected response",
            Self::LocalFile => "file unreadable",
        }
    }
}

/// Recorded on a failed turn in place of a success payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{}: {message}", kind.describe())]
pub struct SubmissionFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl SubmissionFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_display_names_the_kind() {
        let failure = SubmissionFailure::new(FailureKind::Status, "chat endpoint returned 502");
        assert_eq!(
            failure.to_string(),
            "service error: chat endpoint returned 502"
        );
    }

    #[test]
    fn failure_kind_serializes_snake_case() {
        let raw = serde_json::to_string(&FailureKind::MalformedBody).expect("serialize");
        assert_eq!(raw, "\"malformed_body\"");
    }
}
