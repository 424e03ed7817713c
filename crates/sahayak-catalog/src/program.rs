//! Program definitions and their eligibility rules.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use sahayak_core::language::LanguageCode;
use sahayak_core::profile::{Gender, MaritalStatus, Occupation};

/// Text available in one or more languages, with English as the required
/// fallback. Catalog validation rejects entries without an English variant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedText {
    translations: BTreeMap<LanguageCode, String>,
}

impl LocalizedText {
    /// Build from an English string only.
    pub fn english(text: impl Into<String>) -> Self {
        let mut translations = BTreeMap::new();
        translations.insert(LanguageCode::English, text.into());
        Self { translations }
    }

    /// Add or replace a translation.
    pub fn with(mut self, language: LanguageCode, text: impl Into<String>) -> Self {
        self.translations.insert(language, text.into());
        self
    }

    /// Text in the requested language, falling back to English.
    ///
    /// Returns an empty string only for an entry missing its English variant,
    /// which catalog validation prevents.
    pub fn get(&self, language: LanguageCode) -> &str {
        self.translations
            .get(&language)
            .or_else(|| self.translations.get(&LanguageCode::English))
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Whether an English variant is present.
    pub fn has_english(&self) -> bool {
        self.translations.contains_key(&LanguageCode::English)
    }
}

/// Categories a program may belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgramCategory {
    Agriculture,
    Education,
    Healthcare,
    Housing,
    Employment,
    WomenWelfare,
    SeniorCitizen,
    Disability,
    FinancialInclusion,
    SkillDevelopment,
    SocialSecurity,
    Entrepreneurship,
}

/// Eligibility rules for one program.
///
/// Every rule is total over any profile: an absent profile field makes the
/// corresponding predicate "unknown" rather than failing evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EligibilityRules {
    /// Minimum age, inclusive.
    pub age_min: Option<u8>,
    /// Maximum age, inclusive.
    pub age_max: Option<u8>,
    /// Maximum annual income in INR.
    pub income_ceiling: Option<u64>,
    /// Accepted occupations; empty means any.
    pub occupations: Vec<Occupation>,
    /// Required gender; `None` means any.
    pub gender: Option<Gender>,
    /// Required marital status; `None` means any.
    pub marital_status: Option<MaritalStatus>,
    /// States where the program applies; empty means nationwide.
    pub states: Vec<String>,
    pub requires_bank_account: bool,
    pub requires_aadhaar: bool,
    pub requires_bpl_card: bool,
    pub requires_land: bool,
}

impl EligibilityRules {
    /// Whether the program applies in every state.
    ///
    /// The catalog file may also spell this as a single `"all"` entry.
    pub fn is_nationwide(&self) -> bool {
        self.states.is_empty() || self.states.iter().any(|s| s.eq_ignore_ascii_case("all"))
    }

    /// Whether the given state is inside the program's geographic scope.
    pub fn applies_in_state(&self, state: &str) -> bool {
        self.is_nationwide() || self.states.iter().any(|s| s.eq_ignore_ascii_case(state))
    }
}

/// One government assistance program, immutable after catalog load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramDefinition {
    /// Unique identifier, e.g. `PM-KISAN-001`.
    pub id: String,
    pub name: LocalizedText,
    pub description: LocalizedText,
    /// Responsible ministry or department.
    pub ministry: String,
    #[serde(default)]
    pub categories: Vec<ProgramCategory>,
    #[serde(default)]
    pub eligibility: EligibilityRules,
    pub benefit_summary: LocalizedText,
    /// Documents the applicant must produce, e.g. `aadhaar`, `land_records`.
    #[serde(default)]
    pub documents_required: Vec<String>,
    #[serde(default)]
    pub helpline: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}
