//! Speech collaborator contracts and the shared audio artifact cache.
//!
//! Transcription and synthesis engines are external: this crate defines the
//! traits the core consumes and the content-addressed cache that guarantees
//! each unique response text is synthesized exactly once (single-flight) and
//! reused across all sessions until it ages out.

pub mod cache;
pub mod provider;
pub mod sweep;

pub use cache::{AudioArtifact, AudioCache};
pub use provider::{SpeechError, Synthesizer, Transcriber, Transcript};
pub use sweep::AudioSweeper;
