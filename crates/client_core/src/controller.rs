//! Submission state machine: `Idle -> Submitting -> Idle`, one submission at a time.
//!
//! A submission is split into `begin` (takes the in-flight flag), `perform`
//! (the remote call) and `complete` (normalizes, appends exactly one turn and
//! releases the flag). Callers that run the remote call elsewhere, such as the
//! desktop worker thread, hold the [`SubmissionTicket`] in between.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use shared::domain::{FileHandle, Submission, Turn};
use thiserror::Error;
use tracing::{info, warn};

use crate::{error::ClientError, normalize::normalize, session::SessionState, AssistantClient};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitRejected {
    #[error("a submission is already in flight")]
    Busy,
    #[error("query is empty")]
    EmptyQuery,
}

/// Proof that the in-flight flag is held for one submission.
#[derive(Debug)]
#[must_use = "a ticket must be passed to `complete` to release the submission lock"]
pub struct SubmissionTicket {
    submission: Submission,
    started_at: DateTime<Utc>,
}

impl SubmissionTicket {
    pub fn submission(&self) -> &Submission {
        &self.submission
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

pub fn begin(
    session: &mut SessionState,
    submission: Submission,
) -> Result<SubmissionTicket, SubmitRejected> {
    if session.submission_in_flight {
        return Err(SubmitRejected::Busy);
    }
    if let Submission::Text { query } = &submission {
        if query.trim().is_empty() {
            return Err(SubmitRejected::EmptyQuery);
        }
    }

    session.submission_in_flight = true;
    Ok(SubmissionTicket {
        submission,
        started_at: Utc::now(),
    })
}

/// Submits the current draft as a text query.
pub fn begin_text_from_draft(
    session: &mut SessionState,
) -> Result<SubmissionTicket, SubmitRejected> {
    let query = session.draft_query.clone();
    begin(session, Submission::Text { query })
}

/// Records the picked file and starts an upload. No file picked is a no-op.
pub fn begin_file_upload(
    session: &mut SessionState,
    file: Option<FileHandle>,
) -> Result<Option<SubmissionTicket>, SubmitRejected> {
    if session.submission_in_flight {
        return Err(SubmitRejected::Busy);
    }
    session.selected_file = file.clone();
    let Some(file) = file else {
        return Ok(None);
    };

    if !file.has_accepted_extension() {
        warn!(file = %file.name, "uploading a file type the picker does not offer");
    }
    begin(session, Submission::File(file)).map(Some)
}

pub async fn perform<C: AssistantClient + ?Sized>(
    client: &C,
    submission: &Submission,
) -> Result<Value, ClientError> {
    match submission {
        Submission::Text { query } => client.chat(query).await,
        Submission::File(file) => client.analyze_document(file).await,
    }
}

/// Appends the turn for `ticket` and always releases the in-flight flag.
pub fn complete(
    session: &mut SessionState,
    ticket: SubmissionTicket,
    outcome: Result<Value, ClientError>,
) -> &Turn {
    let SubmissionTicket {
        submission,
        started_at,
    } = ticket;
    let label = submission.label();
    let kind = submission.kind();
    let elapsed_ms = (Utc::now() - started_at).num_milliseconds();

    let turn = match outcome.and_then(|body| normalize(&submission, body)) {
        Ok(response) => {
            info!(?kind, elapsed_ms, "submission completed");
            if let Submission::Text { .. } = submission {
                session.draft_query.clear();
            }
            Turn::completed(label, kind, response)
        }
        Err(err) => {
            warn!(?kind, elapsed_ms, error = %err, "submission failed");
            Turn::failed(label, kind, err.to_failure())
        }
    };

    session.submission_in_flight = false;
    let index = session.transcript.len();
    session.transcript.append(turn);
    &session.transcript.all()[index]
}

/// Runs a whole submission on the calling task.
pub struct SubmissionController<C: ?Sized> {
    client: Arc<C>,
}

impl<C: AssistantClient + ?Sized> SubmissionController<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Arc<C> {
        &self.client
    }

    pub async fn submit<'s>(
        &self,
        session: &'s mut SessionState,
        submission: Submission,
    ) -> Result<&'s Turn, SubmitRejected> {
        let ticket = begin(session, submission)?;
        let outcome = perform(self.client.as_ref(), ticket.submission()).await;
        Ok(complete(session, ticket, outcome))
    }

    pub async fn submit_draft<'s>(
        &self,
        session: &'s mut SessionState,
    ) -> Result<&'s Turn, SubmitRejected> {
        let query = session.draft_query.clone();
        self.submit(session, Submission::Text { query }).await
    }

    /// `Ok(None)` when no file was picked.
    pub async fn upload<'s>(
        &self,
        session: &'s mut SessionState,
        file: Option<FileHandle>,
    ) -> Result<Option<&'s Turn>, SubmitRejected> {
        let Some(ticket) = begin_file_upload(session, file)? else {
            return Ok(None);
        };
        let outcome = perform(self.client.as_ref(), ticket.submission()).await;
        Ok(Some(complete(session, ticket, outcome)))
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
