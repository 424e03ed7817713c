//! Error types for the conversational interface.

use sahayak_core::error::SahayakError;
use sahayak_session::SessionError;

/// Errors from the chat engine. All turn-level: a failed turn never damages
/// the session that issued it.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("query cannot be empty")]
    EmptyQuery,
    #[error("query exceeds maximum length of {0} characters")]
    QueryTooLong(usize),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("transcription failed: {0}")]
    Transcription(String),
}

impl From<ChatError> for SahayakError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::Session(e) => e.into(),
            ChatError::Transcription(msg) => SahayakError::Transcription(msg),
            other => SahayakError::Chat(other.to_string()),
        }
    }
}
