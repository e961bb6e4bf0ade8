//! UI layer for the desktop assistant: app shell and transcript widgets.

pub mod app;
pub mod transcript_view;

pub use app::AssistantApp;
