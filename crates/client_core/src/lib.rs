use async_trait::async_trait;
use serde_json::Value;
use shared::{domain::FileHandle, protocol::HealthResponse};

pub mod config;
pub mod controller;
pub mod error;
pub mod normalize;
pub mod render;
pub mod session;
pub mod transcript;
pub mod transport;

pub use config::{load_settings, ClientSettings};
pub use controller::{SubmissionController, SubmissionTicket, SubmitRejected};
pub use error::ClientError;
pub use render::{render, render_transcript, render_turn, DisplayNode, DisplayTree, TurnView};
pub use session::SessionState;
pub use transcript::TranscriptStore;
pub use transport::HttpAssistantClient;

/// The remote analysis service as seen by the submission controller.
///
/// Both submission calls return the raw JSON object body; normalization into
/// a `Response` happens in the controller so every implementation shares it.
#[async_trait]
pub trait AssistantClient: Send + Sync {
    async fn chat(&self, query: &str) -> Result<Value, ClientError>;
    async fn analyze_document(&self, file: &FileHandle) -> Result<Value, ClientError>;
    async fn health(&self) -> Result<HealthResponse, ClientError>;
}
