use thiserror::Error;

/// Top-level error type for the Sahayak system.
///
/// Each variant wraps a subsystem-specific failure. Subsystem crates define
/// their own error types and implement `From<SubsystemError> for SahayakError`
/// so that the `?` operator works seamlessly across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SahayakError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Transcription error: {0}")]
    Transcription(String),

    #[error("Synthesis error: {0}")]
    Synthesis(String),

    #[error("Chat error: {0}")]
    Chat(String),

    #[error("Unsupported language code: {0}")]
    UnsupportedLanguage(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for SahayakError {
    fn from(err: toml::de::Error) -> Self {
        SahayakError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for SahayakError {
    fn from(err: toml::ser::Error) -> Self {
        SahayakError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for SahayakError {
    fn from(err: serde_json::Error) -> Self {
        SahayakError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Sahayak operations.
pub type Result<T> = std::result::Result<T, SahayakError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SahayakError::Config("missing section".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing section");

        let err = SahayakError::Catalog("duplicate id".to_string());
        assert_eq!(err.to_string(), "Catalog error: duplicate id");

        let err = SahayakError::UnsupportedLanguage("xx".to_string());
        assert_eq!(err.to_string(), "Unsupported language code: xx");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: SahayakError = io_err.into();
        assert!(matches!(err, SahayakError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err: SahayakError = json_err.into();
        assert!(matches!(err, SahayakError::Serialization(_)));
    }
}
