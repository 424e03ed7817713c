//! Content-addressed audio artifact cache with single-flight population.
//!
//! The cache key is a hash over the normalized response text, language, and
//! voice rate; the value is a synthesized audio file shared by every session
//! that produces the same response. Each key is synthesized at most once at a
//! time: concurrent callers for an in-flight key wait for and share the
//! single result. Synthesis failures are never cached.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::sync::{Mutex as FlightMutex, OwnedMutexGuard};
use tracing::{debug, warn};

use sahayak_core::language::LanguageCode;

use crate::provider::{SpeechError, Synthesizer};

/// A cached synthesized-audio reference. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioArtifact {
    /// Content hash identifying this artifact.
    pub key: String,
    /// Location of the audio file.
    pub path: PathBuf,
    /// Creation time, epoch seconds.
    pub created_at: i64,
    pub size_bytes: u64,
}

/// Cache slot: either a completed artifact or an in-flight synthesis.
///
/// The `Pending` mutex is held by the populating caller for the duration of
/// the synthesis; waiters block on it and re-check the map once it releases,
/// so no wakeup can be lost between map inspection and waiting.
enum CacheEntry {
    Pending(Arc<FlightMutex<()>>),
    Ready(AudioArtifact),
}

/// Shared audio artifact cache.
pub struct AudioCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    storage_dir: PathBuf,
    retention_secs: i64,
}

impl AudioCache {
    /// Create a cache storing audio files under `storage_dir`, retaining
    /// artifacts for `retention_hours` after creation.
    pub fn new(storage_dir: impl Into<PathBuf>, retention_hours: u32) -> Result<Self, SpeechError> {
        let storage_dir = storage_dir.into();
        std::fs::create_dir_all(&storage_dir)?;
        Ok(Self {
            entries: Mutex::new(HashMap::new()),
            storage_dir,
            retention_secs: i64::from(retention_hours) * 3600,
        })
    }

    /// Return the artifact for (text, language, rate), synthesizing it via
    /// `synthesizer` only if no unexpired artifact exists.
    ///
    /// Single-flight: with N concurrent callers for the same key, exactly one
    /// invokes the synthesizer; the rest wait for and share its result. If
    /// synthesis fails (or the populating caller is cancelled), the key is
    /// released and the next caller retries.
    pub async fn get_or_create(
        &self,
        text: &str,
        language: LanguageCode,
        rate: f32,
        synthesizer: &dyn Synthesizer,
    ) -> Result<AudioArtifact, SpeechError> {
        let key = Self::cache_key(text, language, rate);

        enum Action {
            Wait(Arc<FlightMutex<()>>),
            Populate(OwnedMutexGuard<()>),
        }

        let flight_guard = loop {
            let action = {
                let mut entries = self.lock_entries();
                match entries.get(&key) {
                    Some(CacheEntry::Ready(artifact)) if !self.is_expired(artifact) => {
                        debug!(key = %key, "Audio cache hit");
                        return Ok(artifact.clone());
                    }
                    Some(CacheEntry::Pending(flight)) => Action::Wait(Arc::clone(flight)),
                    // Absent, or expired and due for replacement: claim the key
                    _ => {
                        let flight = Arc::new(FlightMutex::new(()));
                        match Arc::clone(&flight).try_lock_owned() {
                            Ok(guard) => {
                                entries.insert(key.clone(), CacheEntry::Pending(flight));
                                Action::Populate(guard)
                            }
                            // A fresh mutex cannot be contended; treat as a
                            // concurrent flight anyway
                            Err(_) => Action::Wait(flight),
                        }
                    }
                }
            };
            match action {
                Action::Wait(flight) => {
                    // Released when the populating caller finishes or drops
                    let _ = flight.lock().await;
                }
                Action::Populate(guard) => break guard,
            }
        };

        // Drops before `flight_guard`, so the Pending marker is gone from the
        // map before any waiter re-checks it.
        let mut cleanup = PendingCleanup {
            cache: self,
            key: key.clone(),
            armed: true,
        };

        debug!(key = %key, language = %language, "Synthesizing audio");
        let bytes = synthesizer.synthesize(text, language, rate).await?;

        let path = self.storage_dir.join(format!("{}.mp3", key));
        tokio::fs::write(&path, &bytes).await?;

        let artifact = AudioArtifact {
            key: key.clone(),
            path,
            created_at: Utc::now().timestamp(),
            size_bytes: bytes.len() as u64,
        };
        {
            let mut entries = self.lock_entries();
            entries.insert(key, CacheEntry::Ready(artifact.clone()));
        }
        cleanup.armed = false;
        drop(cleanup);
        drop(flight_guard);

        Ok(artifact)
    }

    /// Remove artifacts older than the retention window and delete their
    /// files. Expiry is re-verified under the map lock at deletion time, so a
    /// sweep never removes an entry an in-flight `get_or_create` is about to
    /// return. Pending entries are never swept. Returns the number removed.
    pub fn sweep_expired(&self) -> usize {
        let mut entries = self.lock_entries();
        let expired: Vec<String> = entries
            .iter()
            .filter_map(|(key, entry)| match entry {
                CacheEntry::Ready(artifact) if self.is_expired(artifact) => Some(key.clone()),
                _ => None,
            })
            .collect();

        for key in &expired {
            if let Some(CacheEntry::Ready(artifact)) = entries.remove(key) {
                if let Err(e) = std::fs::remove_file(&artifact.path) {
                    warn!(
                        "Failed to delete expired audio file {}: {}",
                        artifact.path.display(),
                        e
                    );
                }
            }
        }
        expired.len()
    }

    /// Number of cached entries, pending flights included.
    pub fn len(&self) -> usize {
        self.lock_entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_entries().is_empty()
    }

    /// Compute the content-addressed key for (text, language, rate).
    ///
    /// Text is whitespace-normalized; the rate participates with two-decimal
    /// precision so insignificant float noise does not split the cache.
    pub fn cache_key(text: &str, language: LanguageCode, rate: f32) -> String {
        let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
        let mut hasher = Sha256::new();
        hasher.update(normalized.as_bytes());
        hasher.update([0]);
        hasher.update(language.as_code().as_bytes());
        hasher.update([0]);
        hasher.update(format!("{:.2}", rate).as_bytes());
        hex::encode(hasher.finalize())
    }

    fn is_expired(&self, artifact: &AudioArtifact) -> bool {
        Utc::now().timestamp() - artifact.created_at > self.retention_secs
    }

    fn lock_entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Removes a claimed Pending marker if population fails or is cancelled, so
/// the key is not poisoned for later callers.
struct PendingCleanup<'a> {
    cache: &'a AudioCache,
    key: String,
    armed: bool,
}

impl Drop for PendingCleanup<'_> {
    fn drop(&mut self) {
        if self.armed {
            let mut entries = self.cache.lock_entries();
            if matches!(entries.get(&self.key), Some(CacheEntry::Pending(_))) {
                entries.remove(&self.key);
            }
        }
    }
}
