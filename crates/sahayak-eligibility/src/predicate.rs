//! Eligibility predicates.
//!
//! Each constraint in a program's [`EligibilityRules`] becomes one predicate.
//! Predicates are total: evaluating against a profile missing the relevant
//! field yields [`Outcome::Unknown`], never a failure.

use sahayak_catalog::program::EligibilityRules;
use sahayak_core::profile::{Gender, MaritalStatus, Occupation, UserProfile};

/// Result of evaluating one predicate against a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Satisfied,
    Violated,
    /// The relevant profile field is not yet known.
    Unknown,
}

/// One eligibility rule over one profile attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    AgeRange {
        min: Option<u8>,
        max: Option<u8>,
    },
    IncomeCeiling(u64),
    OccupationIn(Vec<Occupation>),
    GenderIs(Gender),
    MaritalStatusIs(MaritalStatus),
    /// Geographic scope. The only *hard* predicate: a violated state scope
    /// excludes the program outright rather than lowering its score.
    StateIn(Vec<String>),
    HasBankAccount,
    HasAadhaar,
    HasBplCard,
    OwnsLand,
}

impl Predicate {
    /// Extract the predicates a rule set declares, in a fixed order.
    pub fn from_rules(rules: &EligibilityRules) -> Vec<Predicate> {
        let mut predicates = Vec::new();
        if rules.age_min.is_some() || rules.age_max.is_some() {
            predicates.push(Predicate::AgeRange {
                min: rules.age_min,
                max: rules.age_max,
            });
        }
        if let Some(ceiling) = rules.income_ceiling {
            predicates.push(Predicate::IncomeCeiling(ceiling));
        }
        if !rules.occupations.is_empty() {
            predicates.push(Predicate::OccupationIn(rules.occupations.clone()));
        }
        if let Some(gender) = rules.gender {
            predicates.push(Predicate::GenderIs(gender));
        }
        if let Some(status) = rules.marital_status {
            predicates.push(Predicate::MaritalStatusIs(status));
        }
        if !rules.is_nationwide() {
            predicates.push(Predicate::StateIn(rules.states.clone()));
        }
        if rules.requires_bank_account {
            predicates.push(Predicate::HasBankAccount);
        }
        if rules.requires_aadhaar {
            predicates.push(Predicate::HasAadhaar);
        }
        if rules.requires_bpl_card {
            predicates.push(Predicate::HasBplCard);
        }
        if rules.requires_land {
            predicates.push(Predicate::OwnsLand);
        }
        predicates
    }

    /// Whether a violation of this predicate excludes the program outright.
    pub fn is_hard(&self) -> bool {
        matches!(self, Predicate::StateIn(_))
    }

    /// Evaluate against a profile. Absent fields yield `Unknown`.
    pub fn evaluate(&self, profile: &UserProfile) -> Outcome {
        match self {
            Predicate::AgeRange { min, max } => match profile.age {
                None => Outcome::Unknown,
                Some(age) => {
                    let above_min = min.map_or(true, |m| age >= m);
                    let below_max = max.map_or(true, |m| age <= m);
                    bool_outcome(above_min && below_max)
                }
            },
            Predicate::IncomeCeiling(ceiling) => match profile.annual_income {
                None => Outcome::Unknown,
                Some(income) => bool_outcome(income <= *ceiling),
            },
            Predicate::OccupationIn(accepted) => match profile.occupation {
                None => Outcome::Unknown,
                Some(occupation) => bool_outcome(accepted.contains(&occupation)),
            },
            Predicate::GenderIs(required) => match profile.gender {
                None => Outcome::Unknown,
                Some(gender) => bool_outcome(gender == *required),
            },
            Predicate::MaritalStatusIs(required) => match profile.marital_status {
                None => Outcome::Unknown,
                Some(status) => bool_outcome(status == *required),
            },
            Predicate::StateIn(states) => match &profile.state {
                None => Outcome::Unknown,
                Some(state) => {
                    bool_outcome(states.iter().any(|s| s.eq_ignore_ascii_case(state)))
                }
            },
            Predicate::HasBankAccount => flag_outcome(profile.has_bank_account),
            Predicate::HasAadhaar => flag_outcome(profile.has_aadhaar),
            Predicate::HasBplCard => flag_outcome(profile.has_bpl_card),
            Predicate::OwnsLand => flag_outcome(profile.owns_land),
        }
    }

    /// Short human-readable statement of the requirement.
    pub fn describe(&self) -> String {
        match self {
            Predicate::AgeRange { min, max } => match (min, max) {
                (Some(min), Some(max)) => format!("age between {} and {}", min, max),
                (Some(min), None) => format!("age {} or above", min),
                (None, Some(max)) => format!("age {} or below", max),
                (None, None) => "any age".to_string(),
            },
            Predicate::IncomeCeiling(ceiling) => {
                format!("annual income at most ₹{}", ceiling)
            }
            Predicate::OccupationIn(accepted) => {
                let names: Vec<String> = accepted
                    .iter()
                    .map(|o| format!("{:?}", o).to_lowercase())
                    .collect();
                format!("occupation: {}", names.join(", "))
            }
            Predicate::GenderIs(gender) => {
                format!("gender: {}", format!("{:?}", gender).to_lowercase())
            }
            Predicate::MaritalStatusIs(status) => {
                format!("marital status: {}", format!("{:?}", status).to_lowercase())
            }
            Predicate::StateIn(states) => format!("resident of: {}", states.join(", ")),
            Predicate::HasBankAccount => "bank account required".to_string(),
            Predicate::HasAadhaar => "Aadhaar card required".to_string(),
            Predicate::HasBplCard => "BPL card required".to_string(),
            Predicate::OwnsLand => "land ownership required".to_string(),
        }
    }
}

fn bool_outcome(satisfied: bool) -> Outcome {
    if satisfied {
        Outcome::Satisfied
    } else {
        Outcome::Violated
    }
}

fn flag_outcome(flag: Option<bool>) -> Outcome {
    match flag {
        None => Outcome::Unknown,
        Some(true) => Outcome::Satisfied,
        Some(false) => Outcome::Violated,
    }
}
