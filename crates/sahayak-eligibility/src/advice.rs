//! Recommendations and next steps derived from ranked match results.
//!
//! Produces short actionable strings for the conversational layer. English
//! only; the response composer localizes the surrounding message.

use std::collections::BTreeSet;

use crate::scorer::MatchResult;

/// Personalized recommendations from a ranked result list.
pub fn recommendations(results: &[MatchResult]) -> Vec<String> {
    let mut out = Vec::new();

    let eligible: Vec<&MatchResult> = results.iter().filter(|r| r.fully_eligible).collect();
    if eligible.is_empty() {
        out.push("You don't fully match any program yet, but here are close matches".to_string());
    } else {
        out.push(format!(
            "You are eligible for {} government program{}",
            eligible.len(),
            if eligible.len() == 1 { "" } else { "s" }
        ));
        out.push(format!("{} is highly recommended for you", eligible[0].program_name));
    }

    // Documents missing across the top matches, deduplicated
    let missing: BTreeSet<&str> = results
        .iter()
        .take(5)
        .flat_map(|r| r.missing_documents.iter().map(String::as_str))
        .collect();
    if !missing.is_empty() {
        let listed: Vec<&str> = missing.into_iter().take(3).collect();
        out.push(format!(
            "Arrange these documents to improve eligibility: {}",
            listed.join(", ")
        ));
    }

    out
}

/// Actionable next steps from the top-ranked results. At most five.
pub fn next_steps(top_results: &[MatchResult]) -> Vec<String> {
    let mut steps = Vec::new();

    for result in top_results {
        if result.fully_eligible {
            steps.push(format!("Apply for {}", result.program_name));
        } else if result.score >= 0.5 {
            if let Some(doc) = result.missing_documents.first() {
                steps.push(format!(
                    "Get {} to qualify for {}",
                    doc, result.program_name
                ));
            }
        }
    }

    if steps.is_empty() {
        steps.push("Visit your nearest Common Service Centre for guidance".to_string());
    }

    steps.truncate(5);
    steps
}
