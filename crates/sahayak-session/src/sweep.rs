//! Background reclamation of idle-expired sessions.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tracing::info;

use crate::store::SessionStore;

/// Background sweeper that periodically removes expired sessions.
pub struct SessionSweeper {
    store: Arc<SessionStore>,
    interval: Duration,
    shutdown: Arc<Notify>,
}

impl SessionSweeper {
    /// Create a sweeper for `store` running every `interval_secs` seconds.
    pub fn new(store: Arc<SessionStore>, interval_secs: u64) -> Self {
        Self {
            store,
            interval: Duration::from_secs(interval_secs),
            shutdown: Arc::new(Notify::new()),
        }
    }

    /// Run the sweep loop. Returns on shutdown signal.
    pub async fn run(&self) {
        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {
                    let removed = self.store.sweep_expired();
                    if removed > 0 {
                        info!(removed, remaining = self.store.len(), "Swept expired sessions");
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

#[cfg(test)]
mod tests {
    use super::*;
    use sahayak_core::config::SessionConfig;

    #[tokio::test]
    async fn test_sweeper_shutdown() {
        let store = Arc::new(SessionStore::new(SessionConfig::default()));
        let sweeper = SessionSweeper::new(store, 300);

        sweeper.shutdown();

        tokio::time::timeout(Duration::from_secs(2), sweeper.run())
            .await
            .expect("Sweeper should shut down within timeout");
    }

    #[tokio::test]
    async fn test_sweeper_ticks_then_stops() {
        let store = Arc::new(SessionStore::new(SessionConfig::default()));
        let sweeper = Arc::new(SessionSweeper::new(Arc::clone(&store), 1));

        let handle = {
            let sweeper = Arc::clone(&sweeper);
            tokio::spawn(async move { sweeper.run().await })
        };

        tokio::time::sleep(Duration::from_millis(1200)).await;
        sweeper.shutdown();
        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("Sweeper task should finish")
            .unwrap();
    }
}
