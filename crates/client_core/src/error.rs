use std::path::PathBuf;

use shared::error::{FailureKind, SubmissionFailure};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to reach {endpoint}: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} returned status {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: u16,
        body: String,
    },
    #[error("{endpoint} returned a malformed body: {reason}")]
    MalformedBody {
        endpoint: &'static str,
        reason: String,
    },
    #[error("could not read '{}': {source}", path.display())]
    LocalFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid endpoint url for {endpoint}: {source}")]
    InvalidUrl {
        endpoint: &'static str,
        #[source]
        source: url::ParseError,
    },
    #[error("backend worker unavailable: {0}")]
    WorkerUnavailable(String),
}

impl ClientError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Transport { .. } | Self::InvalidUrl { .. } | Self::WorkerUnavailable(_) => {
                FailureKind::Transport
            }
            Self::Status { .. } => FailureKind::Status,
            Self::MalformedBody { .. } => FailureKind::MalformedBody,
            Self::LocalFile { .. } => FailureKind::LocalFile,
        }
    }

    pub fn to_failure(&self) -> SubmissionFailure {
        SubmissionFailure::new(self.kind(), self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_maps_to_status_failure() {
        let err = ClientError::Status {
            endpoint: "chat endpoint",
            status: 503,
            body: "warming up".into(),
        };
        let failure = err.to_failure();
        assert_eq!(failure.kind, FailureKind::Status);
        assert_eq!(failure.message, "chat endpoint returned status 503: warming up");
    }

    #[test]
    fn local_file_error_names_the_path() {
        let err = ClientError::LocalFile {
            path: PathBuf::from("missing/policy.pdf"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(err.kind(), FailureKind::LocalFile);
        assert!(err.to_string().contains("missing/policy.pdf"));
    }

    #[test]
    fn worker_loss_is_a_transport_failure() {
        let err = ClientError::WorkerUnavailable("queue disconnected".into());
        assert_eq!(err.kind(), FailureKind::Transport);
    }
}
