//! Backend commands queued from UI to backend worker.

use shared::domain::Submission;

#[derive(Debug)]
pub enum BackendCommand {
    /// Perform the remote call for a submission whose ticket the UI holds.
    Submit(Submission),
    CheckHealth,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Submit(Submission::Text { .. }) => "submit_text",
            Self::Submit(Submission::File(_)) => "submit_file",
            Self::CheckHealth => "check_health",
        }
    }
}
