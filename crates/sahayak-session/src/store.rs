//! Session table with idle expiry and capacity eviction.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex as SessionMutex, OwnedMutexGuard};
use tracing::{debug, info, warn};
use uuid::Uuid;

use sahayak_core::config::SessionConfig;
use sahayak_core::error::SahayakError;
use sahayak_core::language::LanguageCode;
use sahayak_core::profile::UserProfile;

/// Session lifecycle errors.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session not found: {0}")]
    NotFound(Uuid),
    /// The session existed but sat idle past the timeout. The caller must
    /// start a new session; accumulated profile state is gone.
    #[error("session expired: {0}")]
    Expired(Uuid),
    /// The table is full and every session is within its eviction
    /// protection window.
    #[error("session capacity exceeded")]
    CapacityExceeded,
}

impl From<SessionError> for SahayakError {
    fn from(err: SessionError) -> Self {
        SahayakError::Session(err.to_string())
    }
}

/// One completed conversation turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnRecord {
    pub query: String,
    pub response: String,
    /// Cache key of the synthesized audio, when synthesis succeeded.
    pub audio_key: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Per-conversation state: accumulated profile plus bounded turn history.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: Uuid,
    pub language: LanguageCode,
    pub created_at: DateTime<Utc>,
    pub profile: UserProfile,
    history: VecDeque<TurnRecord>,
}

impl Session {
    fn new(language: LanguageCode) -> Self {
        Self {
            id: Uuid::new_v4(),
            language,
            created_at: Utc::now(),
            profile: UserProfile::default(),
            history: VecDeque::new(),
        }
    }

    /// Append a turn, discarding the oldest once `max_turns` is reached.
    pub fn push_turn(&mut self, record: TurnRecord, max_turns: usize) {
        self.history.push_back(record);
        while self.history.len() > max_turns {
            self.history.pop_front();
        }
    }

    /// Retained turns, oldest first.
    pub fn history(&self) -> &VecDeque<TurnRecord> {
        &self.history
    }
}

/// Table slot. `last_active` is epoch seconds, updated without taking the
/// per-session lock so expiry checks stay cheap.
struct SessionSlot {
    session: Arc<SessionMutex<Session>>,
    last_active: AtomicI64,
}

/// In-memory session table.
///
/// The outer map lock is held only for table bookkeeping; turn processing
/// holds the per-session async lock instead, so concurrent turns against the
/// same session serialize while distinct sessions proceed in parallel.
pub struct SessionStore {
    slots: Mutex<HashMap<Uuid, Arc<SessionSlot>>>,
    config: SessionConfig,
}

impl SessionStore {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            config,
        }
    }

    /// Create a new session, evicting the longest-idle one if the table is
    /// full. A session idle less than the protection window is never
    /// evicted; if every session is protected the create is refused.
    pub fn create(
        &self,
        language: LanguageCode,
        initial_profile: Option<UserProfile>,
    ) -> Result<Uuid, SessionError> {
        let now = Utc::now().timestamp();
        let mut slots = self.lock_slots();

        if slots.len() >= self.config.max_sessions {
            let oldest = slots
                .iter()
                .min_by_key(|(_, slot)| slot.last_active.load(Ordering::SeqCst))
                .map(|(id, slot)| (*id, slot.last_active.load(Ordering::SeqCst)));
            match oldest {
                Some((id, last_active))
                    if now - last_active >= self.config.eviction_protection_secs as i64 =>
                {
                    slots.remove(&id);
                    warn!(evicted = %id, "Session table full, evicted longest-idle session");
                }
                _ => return Err(SessionError::CapacityExceeded),
            }
        }

        let mut session = Session::new(language);
        if let Some(profile) = initial_profile {
            session.profile = profile;
        }
        let id = session.id;
        slots.insert(
            id,
            Arc::new(SessionSlot {
                session: Arc::new(SessionMutex::new(session)),
                last_active: AtomicI64::new(now),
            }),
        );
        debug!(session_id = %id, %language, "Session created");
        Ok(id)
    }

    /// Lock a session for one turn, resetting its idle timer.
    ///
    /// An expired session is removed here rather than waiting for the
    /// sweeper, and reported as `Expired` so the caller can start fresh.
    pub async fn checkout(&self, id: Uuid) -> Result<OwnedMutexGuard<Session>, SessionError> {
        let session = {
            let mut slots = self.lock_slots();
            let slot = slots.get(&id).ok_or(SessionError::NotFound(id))?;
            let now = Utc::now().timestamp();
            if now - slot.last_active.load(Ordering::SeqCst) > self.timeout_secs() {
                slots.remove(&id);
                info!(session_id = %id, "Session expired on access");
                return Err(SessionError::Expired(id));
            }
            slot.last_active.store(now, Ordering::SeqCst);
            Arc::clone(&slot.session)
        };
        Ok(session.lock_owned().await)
    }

    /// End a session. Idempotent: ending an absent session is a no-op.
    /// Returns whether the session was present.
    pub fn end(&self, id: Uuid) -> bool {
        let removed = self.lock_slots().remove(&id).is_some();
        if removed {
            debug!(session_id = %id, "Session ended");
        }
        removed
    }

    /// Remove sessions idle past the timeout. Returns the number removed.
    pub fn sweep_expired(&self) -> usize {
        let now = Utc::now().timestamp();
        let timeout = self.timeout_secs();
        let mut slots = self.lock_slots();
        let before = slots.len();
        slots.retain(|_, slot| now - slot.last_active.load(Ordering::SeqCst) <= timeout);
        before - slots.len()
    }

    pub fn len(&self) -> usize {
        self.lock_slots().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_slots().is_empty()
    }

    fn timeout_secs(&self) -> i64 {
        i64::from(self.config.timeout_minutes) * 60
    }

    fn lock_slots(&self) -> MutexGuard<'_, HashMap<Uuid, Arc<SessionSlot>>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
