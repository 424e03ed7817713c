//! Request and response payloads for the conversational interface.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sahayak_core::language::LanguageCode;
use sahayak_eligibility::{MatchFilters, MatchResult};
use sahayak_speech::AudioArtifact;

/// One inbound text turn.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TurnRequest {
    /// Existing session to continue; `None` starts a fresh one.
    pub session_id: Option<Uuid>,
    pub text: String,
    /// Overrides the session language for this and later turns.
    #[serde(default)]
    pub language: Option<LanguageCode>,
    /// Profile facts volunteered this turn, as a loose field map.
    #[serde(default)]
    pub profile_fields: Option<serde_json::Map<String, serde_json::Value>>,
    /// Narrows the candidate programs before scoring.
    #[serde(default)]
    pub filters: Option<MatchFilters>,
}

/// Everything produced by one turn.
#[derive(Debug, Clone, Serialize)]
pub struct TurnResponse {
    pub session_id: Uuid,
    pub response_text: String,
    /// Synthesized audio for `response_text`; `None` when synthesis failed
    /// (the text answer still stands).
    pub audio: Option<AudioArtifact>,
    /// Top-ranked programs, best first.
    pub matches: Vec<MatchResult>,
    pub recommendations: Vec<String>,
    pub next_steps: Vec<String>,
    pub language: LanguageCode,
    /// What the recognizer heard, for voice turns only.
    pub transcript: Option<String>,
}

/// Result of explicitly starting a session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionStartResponse {
    pub session_id: Uuid,
    pub greeting_text: String,
    pub greeting_audio: Option<AudioArtifact>,
}
