//! Events the backend worker reports to the UI thread.

use client_core::ClientError;
use serde_json::Value;
use shared::error::FailureKind;

#[derive(Debug)]
pub enum UiEvent {
    Info(String),
    SubmissionFinished(Result<Value, ClientError>),
    HealthChecked(Result<String, String>),
}

/// Status line text after a failed submission.
pub fn failure_status(kind: FailureKind) -> &'static str {
    match kind {
        FailureKind::Transport => "Assistant service unreachable; check the URL or network and resend.",
        FailureKind::Status => "Assistant service reported an error; resend to try again.",
        FailureKind::MalformedBody => "Assistant service sent an unexpected response.",
        FailureKind::LocalFile => "The chosen document could not be read.",
    }
}
