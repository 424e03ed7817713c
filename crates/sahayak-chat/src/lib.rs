//! Conversational interface for Sahayak.
//!
//! The orchestrator drives one conversation turn end to end: it merges newly
//! volunteered profile facts into the session, ranks the program catalog
//! against the accumulated profile, composes a localized response over the
//! top matches, attaches cached audio, and records the turn in the session
//! history. Voice turns transcribe first and then follow the same path.

pub mod error;
pub mod orchestrator;
pub mod response;
pub mod types;

pub use error::ChatError;
pub use orchestrator::ChatOrchestrator;
pub use response::ResponseComposer;
pub use types::{SessionStartResponse, TurnRequest, TurnResponse};
