use shared::domain::FileHandle;

use crate::transcript::TranscriptStore;

/// Everything one conversation owns. Created empty, idle and with no draft.
#[derive(Debug, Default)]
pub struct SessionState {
    pub(crate) transcript: TranscriptStore,
    /// Unsent text bound to the query input.
    pub draft_query: String,
    pub(crate) selected_file: Option<FileHandle>,
    pub(crate) submission_in_flight: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transcript(&self) -> &TranscriptStore {
        &self.transcript
    }

    pub fn selected_file(&self) -> Option<&FileHandle> {
        self.selected_file.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submission_in_flight
    }

    pub fn can_submit_text(&self) -> bool {
        !self.submission_in_flight && !self.draft_query.trim().is_empty()
    }

    pub fn can_pick_file(&self) -> bool {
        !self.submission_in_flight
    }
}
