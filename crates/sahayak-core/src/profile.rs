//! The incrementally-revealed user profile.
//!
//! A profile starts empty and grows as the citizen volunteers facts across
//! turns. Fields are only ever set or overwritten by an explicit new value;
//! an absent field in an update never clears a known value.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Gender as declared by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
    PreferNotToSay,
}

/// Marital status options recognized by scheme eligibility rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaritalStatus {
    Single,
    Married,
    Widowed,
    Divorced,
    Separated,
}

/// Occupation categories used by scheme eligibility rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Occupation {
    Farmer,
    Laborer,
    Student,
    Unemployed,
    SelfEmployed,
    GovernmentEmployee,
    PrivateEmployee,
    Retired,
    Homemaker,
    Other,
}

/// Everything the assistant has learned about the citizen so far.
///
/// All fields are optional: eligibility predicates must tolerate absence
/// (an absent field lowers match confidence, never causes a failure).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub age: Option<u8>,
    pub gender: Option<Gender>,
    pub state: Option<String>,
    pub district: Option<String>,
    pub occupation: Option<Occupation>,
    /// Annual income in INR.
    pub annual_income: Option<u64>,
    pub marital_status: Option<MaritalStatus>,
    /// Caste category (General/SC/ST/OBC).
    pub category: Option<String>,
    pub has_bank_account: Option<bool>,
    pub has_aadhaar: Option<bool>,
    pub has_bpl_card: Option<bool>,
    pub has_disability: Option<bool>,
    pub owns_land: Option<bool>,
}

/// A partial set of profile facts extracted from one inbound turn.
///
/// Same shape as [`UserProfile`]; only fields that are `Some` are applied
/// during [`UserProfile::merge`].
pub type ProfileUpdate = UserProfile;

impl UserProfile {
    /// Apply an update, setting only fields the update carries.
    ///
    /// Known values are overwritten only by an explicit new value for the
    /// same field and are never cleared.
    pub fn merge(&mut self, update: &ProfileUpdate) {
        macro_rules! take {
            ($field:ident) => {
                if let Some(v) = update.$field.clone() {
                    self.$field = Some(v);
                }
            };
        }
        take!(age);
        take!(gender);
        take!(state);
        take!(district);
        take!(occupation);
        take!(annual_income);
        take!(marital_status);
        take!(category);
        take!(has_bank_account);
        take!(has_aadhaar);
        take!(has_bpl_card);
        take!(has_disability);
        take!(owns_land);
    }

    /// Number of fields currently known.
    pub fn known_fields(&self) -> usize {
        [
            self.age.is_some(),
            self.gender.is_some(),
            self.state.is_some(),
            self.district.is_some(),
            self.occupation.is_some(),
            self.annual_income.is_some(),
            self.marital_status.is_some(),
            self.category.is_some(),
            self.has_bank_account.is_some(),
            self.has_aadhaar.is_some(),
            self.has_bpl_card.is_some(),
            self.has_disability.is_some(),
            self.owns_land.is_some(),
        ]
        .iter()
        .filter(|known| **known)
        .count()
    }

    /// Build an update from a loose JSON field map.
    ///
    /// Fields that fail to parse into their declared type are skipped with a
    /// warning; well-formed fields in the same map still apply. This keeps a
    /// malformed inbound field from failing the whole turn.
    pub fn from_json_fields(fields: &serde_json::Map<String, serde_json::Value>) -> ProfileUpdate {
        let mut update = ProfileUpdate::default();
        for (name, value) in fields {
            let applied = match name.as_str() {
                "age" => parse_into(value, &mut update.age),
                "gender" => parse_into(value, &mut update.gender),
                "state" => parse_into(value, &mut update.state),
                "district" => parse_into(value, &mut update.district),
                "occupation" => parse_into(value, &mut update.occupation),
                "annual_income" => parse_into(value, &mut update.annual_income),
                "marital_status" => parse_into(value, &mut update.marital_status),
                "category" => parse_into(value, &mut update.category),
                "has_bank_account" => parse_into(value, &mut update.has_bank_account),
                "has_aadhaar" => parse_into(value, &mut update.has_aadhaar),
                "has_bpl_card" => parse_into(value, &mut update.has_bpl_card),
                "has_disability" => parse_into(value, &mut update.has_disability),
                "owns_land" => parse_into(value, &mut update.owns_land),
                _ => {
                    warn!(field = %name, "Ignoring unknown profile field");
                    continue;
                }
            };
            if !applied {
                warn!(field = %name, value = %value, "Ignoring malformed profile field");
            }
        }
        update
    }
}

fn parse_into<T: serde::de::DeserializeOwned>(
    value: &serde_json::Value,
    slot: &mut Option<T>,
) -> bool {
    match serde_json::from_value::<T>(value.clone()) {
        Ok(parsed) => {
            *slot = Some(parsed);
            true
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
        value.as_object().unwrap().clone()
    }

    // ---- Merge semantics ----

    #[test]
    fn test_merge_sets_absent_fields() {
        let mut profile = UserProfile::default();
        let update = ProfileUpdate {
            age: Some(45),
            occupation: Some(Occupation::Farmer),
            ..ProfileUpdate::default()
        };
        profile.merge(&update);
        assert_eq!(profile.age, Some(45));
        assert_eq!(profile.occupation, Some(Occupation::Farmer));
        assert_eq!(profile.known_fields(), 2);
    }

    #[test]
    fn test_merge_never_clears_known_fields() {
        let mut profile = UserProfile {
            age: Some(45),
            state: Some("Punjab".to_string()),
            ..UserProfile::default()
        };
        profile.merge(&ProfileUpdate::default());
        assert_eq!(profile.age, Some(45));
        assert_eq!(profile.state.as_deref(), Some("Punjab"));
    }

    #[test]
    fn test_merge_overwrites_with_explicit_value() {
        let mut profile = UserProfile {
            annual_income: Some(80_000),
            ..UserProfile::default()
        };
        let update = ProfileUpdate {
            annual_income: Some(120_000),
            ..ProfileUpdate::default()
        };
        profile.merge(&update);
        assert_eq!(profile.annual_income, Some(120_000));
    }

    #[test]
    fn test_merge_is_monotonic_across_turns() {
        let mut profile = UserProfile::default();
        let turns = [
            ProfileUpdate {
                age: Some(30),
                ..ProfileUpdate::default()
            },
            ProfileUpdate {
                state: Some("Bihar".to_string()),
                ..ProfileUpdate::default()
            },
            ProfileUpdate {
                has_aadhaar: Some(true),
                ..ProfileUpdate::default()
            },
        ];
        for update in &turns {
            profile.merge(update);
        }
        assert_eq!(profile.known_fields(), 3);
    }

    // ---- JSON ingestion ----

    #[test]
    fn test_from_json_fields_well_formed() {
        let update = UserProfile::from_json_fields(&fields(json!({
            "age": 45,
            "occupation": "farmer",
            "annual_income": 80000,
            "has_bank_account": true,
            "state": "Punjab"
        })));
        assert_eq!(update.age, Some(45));
        assert_eq!(update.occupation, Some(Occupation::Farmer));
        assert_eq!(update.annual_income, Some(80_000));
        assert_eq!(update.has_bank_account, Some(true));
        assert_eq!(update.state.as_deref(), Some("Punjab"));
    }

    #[test]
    fn test_from_json_fields_skips_malformed() {
        let update = UserProfile::from_json_fields(&fields(json!({
            "age": "forty-five",
            "occupation": "farmer"
        })));
        // Malformed age ignored, valid occupation still applied
        assert_eq!(update.age, None);
        assert_eq!(update.occupation, Some(Occupation::Farmer));
    }

    #[test]
    fn test_from_json_fields_skips_unknown() {
        let update = UserProfile::from_json_fields(&fields(json!({
            "favourite_colour": "blue",
            "age": 30
        })));
        assert_eq!(update.age, Some(30));
        assert_eq!(update.known_fields(), 1);
    }

    #[test]
    fn test_from_json_fields_unknown_occupation_variant() {
        let update = UserProfile::from_json_fields(&fields(json!({
            "occupation": "astronaut"
        })));
        assert_eq!(update.occupation, None);
    }

    #[test]
    fn test_from_json_fields_age_out_of_range() {
        // u8 cannot hold 300; the field is dropped, not the turn
        let update = UserProfile::from_json_fields(&fields(json!({ "age": 300 })));
        assert_eq!(update.age, None);
    }

    #[test]
    fn test_known_fields_empty_profile() {
        assert_eq!(UserProfile::default().known_fields(), 0);
    }

    #[test]
    fn test_profile_serde_roundtrip() {
        let profile = UserProfile {
            age: Some(60),
            gender: Some(Gender::Female),
            marital_status: Some(MaritalStatus::Widowed),
            ..UserProfile::default()
        };
        let json = serde_json::to_string(&profile).unwrap();
        let back: UserProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, profile);
    }
}
