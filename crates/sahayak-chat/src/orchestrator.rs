//! Chat orchestrator: drives one conversation turn end to end.
//!
//! Per turn: validate the query, lock the session, fold newly volunteered
//! profile facts into it, rank the catalog against the accumulated profile,
//! compose a localized response over the top matches, attach cached audio,
//! and record the turn in the bounded session history. Voice turns
//! transcribe first and then follow the identical path.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};
use uuid::Uuid;

use sahayak_catalog::Catalog;
use sahayak_core::config::{ChatConfig, SahayakConfig};
use sahayak_core::language::LanguageCode;
use sahayak_core::profile::UserProfile;
use sahayak_eligibility::{next_steps, recommendations, score};
use sahayak_session::{Session, SessionError, SessionStore, TurnRecord};
use sahayak_speech::{AudioArtifact, AudioCache, Synthesizer, Transcriber};
use tokio::sync::OwnedMutexGuard;

use crate::error::ChatError;
use crate::response::ResponseComposer;
use crate::types::{SessionStartResponse, TurnRequest, TurnResponse};

/// Central coordinator over the catalog, session table, scorer, and speech
/// collaborators. Cheap to share; every turn-facing method takes `&self`.
pub struct ChatOrchestrator {
    catalog: Arc<Catalog>,
    sessions: Arc<SessionStore>,
    audio: Arc<AudioCache>,
    synthesizer: Arc<dyn Synthesizer>,
    transcriber: Arc<dyn Transcriber>,
    composer: ResponseComposer,
    config: ChatConfig,
    default_language: LanguageCode,
    speech_rate: f32,
}

impl ChatOrchestrator {
    pub fn new(
        catalog: Arc<Catalog>,
        sessions: Arc<SessionStore>,
        audio: Arc<AudioCache>,
        synthesizer: Arc<dyn Synthesizer>,
        transcriber: Arc<dyn Transcriber>,
        config: &SahayakConfig,
    ) -> Self {
        Self {
            catalog,
            sessions,
            audio,
            synthesizer,
            transcriber,
            composer: ResponseComposer,
            config: config.chat.clone(),
            default_language: config.general.default_language,
            speech_rate: config.audio_cache.speech_rate,
        }
    }

    /// Explicitly start a session and return a localized greeting.
    pub async fn start_session(
        &self,
        language: Option<LanguageCode>,
    ) -> Result<SessionStartResponse, ChatError> {
        let language = language.unwrap_or(self.default_language);
        let session_id = self.sessions.create(language, None)?;
        let greeting_text = self.composer.greeting(language);
        let greeting_audio = self.synthesize_best_effort(&greeting_text, language).await;
        Ok(SessionStartResponse {
            session_id,
            greeting_text,
            greeting_audio,
        })
    }

    /// Handle one text turn.
    ///
    /// A missing or unknown session id starts a fresh session rather than
    /// failing the turn; an *expired* id is an error, because the profile
    /// the caller was building is gone and they should be told so.
    pub async fn handle_turn(&self, request: TurnRequest) -> Result<TurnResponse, ChatError> {
        self.run_turn(request, None).await
    }

    /// Handle one voice turn: transcribe, then proceed as a text turn in the
    /// language the recognizer detected.
    pub async fn handle_voice_turn(
        &self,
        audio: &[u8],
        session_id: Option<Uuid>,
        language_hint: Option<LanguageCode>,
    ) -> Result<TurnResponse, ChatError> {
        let transcript = self
            .transcriber
            .transcribe(audio, language_hint)
            .await
            .map_err(|e| ChatError::Transcription(e.to_string()))?;
        debug!(
            language = %transcript.language,
            confidence = transcript.confidence,
            "Voice turn transcribed"
        );

        let request = TurnRequest {
            session_id,
            text: transcript.text.clone(),
            language: Some(transcript.language),
            profile_fields: None,
            filters: None,
        };
        self.run_turn(request, Some(transcript.text)).await
    }

    /// End a session. Idempotent: ending an unknown or already-ended session
    /// is a no-op. Returns whether the session was present.
    pub fn end_session(&self, session_id: Uuid) -> bool {
        self.sessions.end(session_id)
    }

    /// Retained turn history for a session, oldest first.
    pub async fn history(&self, session_id: Uuid) -> Result<Vec<TurnRecord>, ChatError> {
        let session = self.sessions.checkout(session_id).await?;
        Ok(session.history().iter().cloned().collect())
    }

    async fn run_turn(
        &self,
        request: TurnRequest,
        transcript: Option<String>,
    ) -> Result<TurnResponse, ChatError> {
        if request.text.trim().is_empty() {
            return Err(ChatError::EmptyQuery);
        }
        if request.text.chars().count() > self.config.max_query_chars {
            return Err(ChatError::QueryTooLong(self.config.max_query_chars));
        }

        let mut session = self
            .checkout_or_create(request.session_id, request.language)
            .await?;
        let session_id = session.id;

        if let Some(language) = request.language {
            session.language = language;
        }
        let language = session.language;

        if let Some(fields) = &request.profile_fields {
            let update = UserProfile::from_json_fields(fields);
            session.profile.merge(&update);
        }

        let mut ranked = score(&session.profile, &self.catalog, request.filters.as_ref());
        ranked.truncate(self.config.top_matches);

        let recommendations = recommendations(&ranked);
        let next_steps = next_steps(&ranked);
        let response_text = self.composer.compose(&ranked, &self.catalog, language);
        let audio = self.synthesize_best_effort(&response_text, language).await;

        session.push_turn(
            TurnRecord {
                query: request.text,
                response: response_text.clone(),
                audio_key: audio.as_ref().map(|a| a.key.clone()),
                timestamp: Utc::now(),
            },
            self.config.history_turns,
        );
        debug!(
            %session_id,
            known_fields = session.profile.known_fields(),
            matches = ranked.len(),
            "Turn completed"
        );

        Ok(TurnResponse {
            session_id,
            response_text,
            audio,
            matches: ranked,
            recommendations,
            next_steps,
            language,
            transcript,
        })
    }

    async fn checkout_or_create(
        &self,
        session_id: Option<Uuid>,
        language: Option<LanguageCode>,
    ) -> Result<OwnedMutexGuard<Session>, ChatError> {
        let language = language.unwrap_or(self.default_language);
        match session_id {
            Some(id) => match self.sessions.checkout(id).await {
                Ok(session) => Ok(session),
                // Unknown id (never existed, or already swept): start fresh
                Err(SessionError::NotFound(_)) => {
                    let fresh = self.sessions.create(language, None)?;
                    debug!(requested = %id, created = %fresh, "Unknown session id, started fresh");
                    Ok(self.sessions.checkout(fresh).await?)
                }
                Err(e) => Err(e.into()),
            },
            None => {
                let fresh = self.sessions.create(language, None)?;
                Ok(self.sessions.checkout(fresh).await?)
            }
        }
    }

    /// Synthesis is best-effort: a failed synthesis degrades the turn to
    /// text-only instead of failing it.
    async fn synthesize_best_effort(
        &self,
        text: &str,
        language: LanguageCode,
    ) -> Option<AudioArtifact> {
        match self
            .audio
            .get_or_create(text, language, self.speech_rate, self.synthesizer.as_ref())
            .await
        {
            Ok(artifact) => Some(artifact),
            Err(e) => {
                warn!("Synthesis failed, returning text-only turn: {}", e);
                None
            }
        }
    }
}
