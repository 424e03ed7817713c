use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, SahayakError};
use crate::language::LanguageCode;

/// Top-level configuration for the Sahayak assistant.
///
/// Loaded from `~/.sahayak/config.toml` by default. Each section corresponds
/// to a subsystem or cross-cutting concern.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SahayakConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub audio_cache: AudioCacheConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

impl SahayakConfig {
    /// Default configuration file location: `~/.sahayak/config.toml`, or
    /// `config.toml` in the working directory when `HOME` is unset.
    pub fn default_path() -> PathBuf {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(".sahayak").join("config.toml");
        }
        PathBuf::from("config.toml")
    }

    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: SahayakConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| SahayakError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Path to the program catalog JSON file.
    pub catalog_path: String,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
    /// Default conversation language when the caller specifies none.
    pub default_language: LanguageCode,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            catalog_path: "data/programs.json".to_string(),
            log_level: "info".to_string(),
            default_language: LanguageCode::Hindi,
        }
    }
}

/// Session table configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Idle minutes after which a session expires.
    pub timeout_minutes: u32,
    /// Maximum live sessions before oldest-idle eviction kicks in.
    pub max_sessions: usize,
    /// Seconds between expired-session sweeps.
    pub sweep_interval_secs: u64,
    /// A session idle for less than this many seconds is never
    /// capacity-evicted.
    pub eviction_protection_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout_minutes: 30,
            max_sessions: 1000,
            sweep_interval_secs: 300,
            eviction_protection_secs: 60,
        }
    }
}

/// Audio artifact cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioCacheConfig {
    /// Directory where synthesized audio files are stored.
    pub storage_dir: String,
    /// Hours an audio artifact is retained before eviction.
    pub retention_hours: u32,
    /// Seconds between artifact sweeps.
    pub sweep_interval_secs: u64,
    /// Voice rate passed to the synthesis provider (1.0 = normal).
    pub speech_rate: f32,
}

impl Default for AudioCacheConfig {
    fn default() -> Self {
        Self {
            storage_dir: "storage/audio".to_string(),
            retention_hours: 24,
            sweep_interval_secs: 3600,
            // Slightly slower than normal for better comprehension
            speech_rate: 0.9,
        }
    }
}

/// Conversation orchestrator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Number of top-ranked programs surfaced per turn.
    pub top_matches: usize,
    /// Maximum turns retained in a session's history ring.
    pub history_turns: usize,
    /// Maximum inbound query length in characters.
    pub max_query_chars: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            top_matches: 5,
            history_turns: 10,
            max_query_chars: 2000,
        }
    }
}
