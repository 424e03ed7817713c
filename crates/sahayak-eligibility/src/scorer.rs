//! Ranking the catalog against a partial profile.

use serde::{Deserialize, Serialize};

use sahayak_catalog::catalog::Catalog;
use sahayak_catalog::program::{ProgramCategory, ProgramDefinition};
use sahayak_core::profile::{Occupation, UserProfile};

use crate::predicate::{Outcome, Predicate};

/// Hard filters that narrow the candidate set *before* scoring.
///
/// A filtered-out program is absent from the results entirely; filters never
/// alter the score of a surviving program.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchFilters {
    /// Keep only programs accepting at least one of these occupations
    /// (programs open to any occupation always pass).
    pub occupations: Vec<Occupation>,
    /// Keep only programs applicable in this state.
    pub state: Option<String>,
    /// Keep only programs in at least one of these categories.
    pub categories: Vec<ProgramCategory>,
}

impl MatchFilters {
    fn admits(&self, program: &ProgramDefinition) -> bool {
        if !self.occupations.is_empty()
            && !program.eligibility.occupations.is_empty()
            && !self
                .occupations
                .iter()
                .any(|o| program.eligibility.occupations.contains(o))
        {
            return false;
        }
        if let Some(state) = &self.state {
            if !program.eligibility.applies_in_state(state) {
                return false;
            }
        }
        if !self.categories.is_empty()
            && !self.categories.iter().any(|c| program.categories.contains(c))
        {
            return false;
        }
        true
    }
}

/// Outcome of scoring one program. Computed fresh per call, never cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub program_id: String,
    /// English program name; the conversational layer localizes via the
    /// catalog when composing a response.
    pub program_name: String,
    /// Score in [0, 1].
    pub score: f64,
    /// True only if every predicate is applicable and satisfied.
    pub fully_eligible: bool,
    /// Human-readable per-predicate outcomes, in predicate order.
    pub reasons: Vec<String>,
    /// Required documents the profile explicitly lacks.
    pub missing_documents: Vec<String>,
}

/// Score and rank the catalog against a profile.
///
/// Results are sorted descending by score; ties keep catalog declaration
/// order (the sort is stable). Deterministic for identical inputs.
///
/// Score = (satisfied / applicable) × (applicable / total): the fraction of
/// evaluable predicates that hold, damped by how much of the program's rule
/// set was evaluable at all, so a thin profile never outranks a fully-known
/// match. A violated *hard* predicate (state scope) zeroes the program
/// regardless of the other predicates. A program with no applicable
/// predicates scores 0 but is still returned, so the conversational layer
/// can prompt for the missing information. A program that declares no
/// predicates at all is open to everyone and scores 1.
pub fn score(
    profile: &UserProfile,
    catalog: &Catalog,
    filters: Option<&MatchFilters>,
) -> Vec<MatchResult> {
    let mut results: Vec<MatchResult> = catalog
        .all()
        .iter()
        .filter(|program| filters.map_or(true, |f| f.admits(program)))
        .map(|program| score_program(profile, program))
        .collect();

    results.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    results
}

fn score_program(profile: &UserProfile, program: &ProgramDefinition) -> MatchResult {
    let predicates = Predicate::from_rules(&program.eligibility);
    let total = predicates.len();

    let mut satisfied = 0usize;
    let mut applicable = 0usize;
    let mut hard_violation = false;
    let mut reasons = Vec::with_capacity(total);

    for predicate in &predicates {
        match predicate.evaluate(profile) {
            Outcome::Satisfied => {
                satisfied += 1;
                applicable += 1;
                reasons.push(format!("meets: {}", predicate.describe()));
            }
            Outcome::Violated => {
                applicable += 1;
                if predicate.is_hard() {
                    hard_violation = true;
                }
                reasons.push(format!("does not meet: {}", predicate.describe()));
            }
            Outcome::Unknown => {
                reasons.push(format!("unknown: {}", predicate.describe()));
            }
        }
    }

    let (score, fully_eligible) = if hard_violation {
        (0.0, false)
    } else if total == 0 {
        // No declared predicates: open to everyone
        (1.0, true)
    } else if applicable == 0 {
        (0.0, false)
    } else {
        let correctness = satisfied as f64 / applicable as f64;
        let coverage = applicable as f64 / total as f64;
        (correctness * coverage, satisfied == total)
    };

    MatchResult {
        program_id: program.id.clone(),
        program_name: program.name.get(sahayak_core::LanguageCode::English).to_string(),
        score,
        fully_eligible,
        reasons,
        missing_documents: missing_documents(profile, program),
    }
}

/// Required documents the profile explicitly reports lacking. Documents whose
/// availability is still unknown are not listed.
fn missing_documents(profile: &UserProfile, program: &ProgramDefinition) -> Vec<String> {
    program
        .documents_required
        .iter()
        .filter(|doc| {
            let flag = match doc.as_str() {
                "aadhaar" => profile.has_aadhaar,
                "bank_account" => profile.has_bank_account,
                "bpl_card" => profile.has_bpl_card,
                "land_records" => profile.owns_land,
                _ => None,
            };
            flag == Some(false)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Catalog from the end-to-end example: a nationwide farmer
    /// income-support program and a women-only savings program.
    fn example_catalog() -> Catalog {
        Catalog::load_from_str(
            r#"[
                {
                    "id": "FARM-1",
                    "name": { "en": "Farmer Income Support" },
                    "description": { "en": "Annual income support for farmers" },
                    "ministry": "Agriculture",
                    "categories": ["agriculture"],
                    "eligibility": {
                        "occupations": ["farmer"],
                        "income_ceiling": 200000
                    },
                    "benefit_summary": { "en": "Rs 6000 per year" },
                    "documents_required": ["aadhaar", "bank_account"]
                },
                {
                    "id": "WOMEN-1",
                    "name": { "en": "Women Savings Program" },
                    "description": { "en": "Savings program for women" },
                    "ministry": "Finance",
                    "categories": ["women_welfare"],
                    "eligibility": { "gender": "female" },
                    "benefit_summary": { "en": "Subsidized savings account" }
                },
                {
                    "id": "PUNJAB-1",
                    "name": { "en": "Punjab Farm Aid" },
                    "description": { "en": "State farm aid" },
                    "ministry": "Punjab Agriculture Dept",
                    "categories": ["agriculture"],
                    "eligibility": {
                        "occupations": ["farmer"],
                        "states": ["Punjab"]
                    },
                    "benefit_summary": { "en": "Equipment subsidy" }
                }
            ]"#,
        )
        .unwrap()
    }

    fn farmer_profile() -> UserProfile {
        UserProfile {
            occupation: Some(Occupation::Farmer),
            annual_income: Some(80_000),
            has_bank_account: Some(true),
            has_aadhaar: Some(true),
            state: Some("Punjab".to_string()),
            ..UserProfile::default()
        }
    }

    // ---- The end-to-end example ----

    #[test]
    fn test_farmer_fully_eligible_and_ranked_first() {
        let catalog = example_catalog();
        let results = score(&farmer_profile(), &catalog, None);

        assert_eq!(results[0].program_id, "FARM-1");
        assert_eq!(results[0].score, 1.0);
        assert!(results[0].fully_eligible);

        // Gender-constrained program has an inapplicable predicate and a
        // partial score at best; it ranks below the full match.
        let women = results
            .iter()
            .find(|r| r.program_id == "WOMEN-1")
            .unwrap();
        assert!(women.score < results[0].score);
        assert!(!women.fully_eligible);
    }

    // ---- Ordering properties ----

    #[test]
    fn test_sorted_descending_and_deterministic() {
        let catalog = example_catalog();
        let profile = farmer_profile();
        let first = score(&profile, &catalog, None);
        for window in first.windows(2) {
            assert!(window[0].score >= window[1].score);
        }
        let second = score(&profile, &catalog, None);
        let ids =
            |rs: &[MatchResult]| rs.iter().map(|r| r.program_id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(&first), ids(&second));
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        let catalog = example_catalog();
        // Empty profile: every program has zero applicable predicates and
        // scores 0; catalog declaration order must survive the sort.
        let results = score(&UserProfile::default(), &catalog, None);
        let ids: Vec<&str> = results.iter().map(|r| r.program_id.as_str()).collect();
        assert_eq!(ids, vec!["FARM-1", "WOMEN-1", "PUNJAB-1"]);
        assert!(results.iter().all(|r| r.score == 0.0));
        assert!(results.iter().all(|r| !r.fully_eligible));
    }

    #[test]
    fn test_zero_applicable_still_returned() {
        let catalog = example_catalog();
        let results = score(&UserProfile::default(), &catalog, None);
        assert_eq!(results.len(), catalog.len());
    }

    // ---- Monotonicity ----

    #[test]
    fn test_adding_consistent_attribute_never_decreases_score() {
        let catalog = example_catalog();
        let mut profile = UserProfile {
            occupation: Some(Occupation::Farmer),
            ..UserProfile::default()
        };
        let before = score(&profile, &catalog, None);
        let farm_before = before.iter().find(|r| r.program_id == "FARM-1").unwrap();

        profile.annual_income = Some(80_000);
        let after = score(&profile, &catalog, None);
        let farm_after = after.iter().find(|r| r.program_id == "FARM-1").unwrap();

        assert!(farm_after.score >= farm_before.score);
        assert!(farm_after.fully_eligible);
    }

    #[test]
    fn test_fully_eligible_independent_of_update_order() {
        let catalog = example_catalog();
        let mut forward = UserProfile::default();
        forward.occupation = Some(Occupation::Farmer);
        forward.annual_income = Some(80_000);

        let mut backward = UserProfile::default();
        backward.annual_income = Some(80_000);
        backward.occupation = Some(Occupation::Farmer);

        for profile in [&forward, &backward] {
            let results = score(profile, &catalog, None);
            let farm = results.iter().find(|r| r.program_id == "FARM-1").unwrap();
            assert!(farm.fully_eligible);
            assert_eq!(farm.score, 1.0);
        }
    }

    // ---- Hard exclusion ----

    #[test]
    fn test_state_mismatch_zeroes_program() {
        let catalog = example_catalog();
        let mut profile = farmer_profile();
        // Before the contradicting value, PUNJAB-1 is partially matched
        profile.state = None;
        let before = score(&profile, &catalog, None);
        let punjab = before.iter().find(|r| r.program_id == "PUNJAB-1").unwrap();
        assert!(punjab.score > 0.0);

        // An explicit state outside scope drives it to exactly 0
        profile.state = Some("Kerala".to_string());
        let after = score(&profile, &catalog, None);
        let punjab = after.iter().find(|r| r.program_id == "PUNJAB-1").unwrap();
        assert_eq!(punjab.score, 0.0);
        assert!(!punjab.fully_eligible);
        // Soft predicates still satisfied, but the hard exclusion wins
        assert!(punjab.reasons.iter().any(|r| r.starts_with("meets:")));
    }

    // ---- Coverage damping ----

    #[test]
    fn test_partial_profile_scores_below_full_profile() {
        let catalog = example_catalog();
        // Occupation known (satisfied), income unknown: 1/1 × 1/2 = 0.5
        let partial = UserProfile {
            occupation: Some(Occupation::Farmer),
            ..UserProfile::default()
        };
        let results = score(&partial, &catalog, None);
        let farm = results.iter().find(|r| r.program_id == "FARM-1").unwrap();
        assert!((farm.score - 0.5).abs() < 1e-9);
        assert!(!farm.fully_eligible);
        assert!(farm.reasons.iter().any(|r| r.starts_with("unknown:")));
    }

    #[test]
    fn test_violated_soft_predicate_lowers_not_zeroes() {
        let catalog = example_catalog();
        let profile = UserProfile {
            occupation: Some(Occupation::Farmer),
            annual_income: Some(500_000), // above ceiling
            ..UserProfile::default()
        };
        let results = score(&profile, &catalog, None);
        let farm = results.iter().find(|r| r.program_id == "FARM-1").unwrap();
        // 1 of 2 applicable satisfied, full coverage: 0.5
        assert!((farm.score - 0.5).abs() < 1e-9);
        assert!(!farm.fully_eligible);
    }

    // ---- Filters ----

    #[test]
    fn test_state_filter_drops_out_of_scope_programs() {
        let catalog = example_catalog();
        let filters = MatchFilters {
            state: Some("Kerala".to_string()),
            ..MatchFilters::default()
        };
        let results = score(&farmer_profile(), &catalog, Some(&filters));
        assert!(results.iter().all(|r| r.program_id != "PUNJAB-1"));
    }

    #[test]
    fn test_occupation_filter() {
        let catalog = example_catalog();
        let filters = MatchFilters {
            occupations: vec![Occupation::Student],
            ..MatchFilters::default()
        };
        let results = score(&UserProfile::default(), &catalog, Some(&filters));
        // Farmer-only programs are dropped; the open-occupation program stays
        let ids: Vec<&str> = results.iter().map(|r| r.program_id.as_str()).collect();
        assert_eq!(ids, vec!["WOMEN-1"]);
    }

    #[test]
    fn test_category_filter() {
        let catalog = example_catalog();
        let filters = MatchFilters {
            categories: vec![ProgramCategory::Agriculture],
            ..MatchFilters::default()
        };
        let results = score(&UserProfile::default(), &catalog, Some(&filters));
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.program_id != "WOMEN-1"));
    }

    #[test]
    fn test_filters_do_not_change_surviving_scores() {
        let catalog = example_catalog();
        let profile = farmer_profile();
        let unfiltered = score(&profile, &catalog, None);
        let filters = MatchFilters {
            categories: vec![ProgramCategory::Agriculture],
            ..MatchFilters::default()
        };
        let filtered = score(&profile, &catalog, Some(&filters));
        for result in &filtered {
            let same = unfiltered
                .iter()
                .find(|r| r.program_id == result.program_id)
                .unwrap();
            assert_eq!(result.score, same.score);
        }
    }

    // ---- Missing documents ----

    #[test]
    fn test_missing_documents_only_explicit() {
        let catalog = example_catalog();
        let profile = UserProfile {
            occupation: Some(Occupation::Farmer),
            has_aadhaar: Some(false),
            // bank account availability unknown
            ..UserProfile::default()
        };
        let results = score(&profile, &catalog, None);
        let farm = results.iter().find(|r| r.program_id == "FARM-1").unwrap();
        assert_eq!(farm.missing_documents, vec!["aadhaar".to_string()]);
    }

    // ---- Program with no predicates ----

    #[test]
    fn test_unconstrained_program_scores_one() {
        let catalog = Catalog::load_from_str(
            r#"[{
                "id": "OPEN-1",
                "name": { "en": "Open Program" },
                "description": { "en": "" },
                "ministry": "M",
                "benefit_summary": { "en": "" }
            }]"#,
        )
        .unwrap();
        let results = score(&UserProfile::default(), &catalog, None);
        assert_eq!(results[0].score, 1.0);
        assert!(results[0].fully_eligible);
    }
}
