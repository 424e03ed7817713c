//! External speech provider contracts.

use async_trait::async_trait;

use sahayak_core::error::SahayakError;
use sahayak_core::language::LanguageCode;

/// Errors from speech providers and the audio cache.
#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    #[error("transcription failed: {0}")]
    Transcription(String),
    #[error("synthesis failed: {0}")]
    Synthesis(String),
    #[error("audio storage error: {0}")]
    Storage(#[from] std::io::Error),
}

impl From<SpeechError> for SahayakError {
    fn from(err: SpeechError) -> Self {
        match err {
            SpeechError::Transcription(msg) => SahayakError::Transcription(msg),
            SpeechError::Synthesis(msg) => SahayakError::Synthesis(msg),
            SpeechError::Storage(e) => SahayakError::Io(e),
        }
    }
}

/// Result of transcribing one audio clip.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    pub text: String,
    /// Language the provider detected (may differ from the hint).
    pub language: LanguageCode,
    /// Provider confidence in [0, 1].
    pub confidence: f32,
}

/// Speech-to-text collaborator.
///
/// Failures are turn-level and recoverable; the session survives them.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(
        &self,
        audio: &[u8],
        language_hint: Option<LanguageCode>,
    ) -> Result<Transcript, SpeechError>;
}

/// Text-to-speech collaborator, invoked only from the audio cache's
/// single-flight population path.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    async fn synthesize(
        &self,
        text: &str,
        language: LanguageCode,
        rate: f32,
    ) -> Result<Vec<u8>, SpeechError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speech_error_display() {
        let err = SpeechError::Transcription("speech not understood".to_string());
        assert_eq!(err.to_string(), "transcription failed: speech not understood");

        let err = SpeechError::Synthesis("voice unavailable".to_string());
        assert_eq!(err.to_string(), "synthesis failed: voice unavailable");
    }

    #[test]
    fn test_conversion_to_top_level_error() {
        let err: SahayakError = SpeechError::Transcription("x".to_string()).into();
        assert!(matches!(err, SahayakError::Transcription(_)));

        let err: SahayakError = SpeechError::Synthesis("y".to_string()).into();
        assert!(matches!(err, SahayakError::Synthesis(_)));
    }

    #[test]
    fn test_traits_are_object_safe() {
        fn assert_object_safe(_: Option<&dyn Transcriber>, _: Option<&dyn Synthesizer>) {}
        assert_object_safe(None, None);
    }
}
