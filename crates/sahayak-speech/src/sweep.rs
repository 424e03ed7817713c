//! Background eviction loop for the audio artifact cache.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tracing::info;

use crate::cache::AudioCache;

/// Background sweeper that periodically evicts expired audio artifacts.
pub struct AudioSweeper {
    cache: Arc<AudioCache>,
    interval: Duration,
    shutdown: Arc<Notify>,
}

impl AudioSweeper {
    /// Create a sweeper for `cache` running every `interval_secs` seconds.
    pub fn new(cache: Arc<AudioCache>, interval_secs: u64) -> Self {
        Self {
            cache,
            interval: Duration::from_secs(interval_secs),
            shutdown: Arc::new(Notify::new()),
        }
    }

    /// Run the sweep loop. Returns on shutdown signal.
    pub async fn run(&self) {
        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {
                    let removed = self.cache.sweep_expired();
                    if removed > 0 {
                        info!(removed, "Evicted expired audio artifacts");
                    }
                }
                _ = self.shutdown.notified() => return,
            }
        }
    }

    /// Signal the sweeper to shut down gracefully.
    pub fn shutdown(&self) {
        self.shutdown.notify_one();
    }
}
