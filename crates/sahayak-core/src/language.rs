//! Supported languages and code normalization.

use serde::{Deserialize, Serialize};

/// Languages the assistant can converse in.
///
/// Serialized as the two-letter ISO 639-1 code throughout the catalog file
/// format and the turn payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LanguageCode {
    #[serde(rename = "en")]
    English,
    #[serde(rename = "hi")]
    Hindi,
    #[serde(rename = "ta")]
    Tamil,
    #[serde(rename = "te")]
    Telugu,
    #[serde(rename = "bn")]
    Bengali,
    #[serde(rename = "mr")]
    Marathi,
    #[serde(rename = "gu")]
    Gujarati,
    #[serde(rename = "kn")]
    Kannada,
    #[serde(rename = "ml")]
    Malayalam,
    #[serde(rename = "pa")]
    Punjabi,
    #[serde(rename = "or")]
    Odia,
}

impl LanguageCode {
    /// All supported languages, in catalog declaration order.
    pub const ALL: [LanguageCode; 11] = [
        LanguageCode::English,
        LanguageCode::Hindi,
        LanguageCode::Tamil,
        LanguageCode::Telugu,
        LanguageCode::Bengali,
        LanguageCode::Marathi,
        LanguageCode::Gujarati,
        LanguageCode::Kannada,
        LanguageCode::Malayalam,
        LanguageCode::Punjabi,
        LanguageCode::Odia,
    ];

    /// The two-letter ISO 639-1 code.
    pub fn as_code(self) -> &'static str {
        match self {
            LanguageCode::English => "en",
            LanguageCode::Hindi => "hi",
            LanguageCode::Tamil => "ta",
            LanguageCode::Telugu => "te",
            LanguageCode::Bengali => "bn",
            LanguageCode::Marathi => "mr",
            LanguageCode::Gujarati => "gu",
            LanguageCode::Kannada => "kn",
            LanguageCode::Malayalam => "ml",
            LanguageCode::Punjabi => "pa",
            LanguageCode::Odia => "or",
        }
    }

    /// English display name, used in logs and fallback prompts.
    pub fn display_name(self) -> &'static str {
        match self {
            LanguageCode::English => "English",
            LanguageCode::Hindi => "Hindi",
            LanguageCode::Tamil => "Tamil",
            LanguageCode::Telugu => "Telugu",
            LanguageCode::Bengali => "Bengali",
            LanguageCode::Marathi => "Marathi",
            LanguageCode::Gujarati => "Gujarati",
            LanguageCode::Kannada => "Kannada",
            LanguageCode::Malayalam => "Malayalam",
            LanguageCode::Punjabi => "Punjabi",
            LanguageCode::Odia => "Odia",
        }
    }

    /// Parse a language code, accepting two-letter ISO 639-1 and the common
    /// three-letter ISO 639-2 forms, case-insensitively.
    pub fn parse(code: &str) -> Option<LanguageCode> {
        let normalized = code.trim().to_ascii_lowercase();
        let two = match normalized.as_str() {
            "eng" => "en",
            "hin" => "hi",
            "tam" => "ta",
            "tel" => "te",
            "ben" => "bn",
            "mar" => "mr",
            "guj" => "gu",
            "kan" => "kn",
            "mal" => "ml",
            "pan" => "pa",
            "ori" => "or",
            other => other,
        };
        LanguageCode::ALL.iter().copied().find(|l| l.as_code() == two)
    }
}

impl Default for LanguageCode {
    fn default() -> Self {
        LanguageCode::Hindi
    }
}

impl std::fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_code())
    }
}
