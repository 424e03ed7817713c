//! Deterministic localized response composition.
//!
//! Responses are templated, not generated: the same ranked matches in the
//! same language always produce the same text, which is what makes the audio
//! cache effective. Program names and benefit lines come localized from the
//! catalog; the surrounding scaffold has native templates for Hindi and
//! English and falls back to the English scaffold for the other languages
//! while still localizing catalog text.

use sahayak_catalog::Catalog;
use sahayak_core::language::LanguageCode;
use sahayak_eligibility::MatchResult;

/// Scaffold strings for one language.
struct Scaffold {
    greeting: &'static str,
    results_intro: &'static str,
    fully_eligible: &'static str,
    partial_match: &'static str,
    need_more_info: &'static str,
    benefit_prefix: &'static str,
}

const ENGLISH: Scaffold = Scaffold {
    greeting: "Namaste! I am Sahayak, your guide to government assistance programs. \
               Tell me about yourself, for example your age, state, occupation and income, \
               and I will find programs you may be eligible for.",
    results_intro: "Based on what you have told me, these programs may help you:",
    fully_eligible: "you appear fully eligible",
    partial_match: "match",
    need_more_info: "I need to know a little more to find the right programs for you. \
                     Please share your age, state, occupation and yearly income.",
    benefit_prefix: "Benefit",
};

const HINDI: Scaffold = Scaffold {
    greeting: "नमस्ते! मैं सहायक हूँ, सरकारी योजनाओं के लिए आपका मार्गदर्शक। \
               मुझे अपनी उम्र, राज्य, व्यवसाय और आय बताइए, \
               मैं आपके लिए उपयुक्त योजनाएँ ढूँढूँगा।",
    results_intro: "आपकी जानकारी के आधार पर, ये योजनाएँ आपके लिए उपयोगी हो सकती हैं:",
    fully_eligible: "आप पूरी तरह पात्र हैं",
    partial_match: "मिलान",
    need_more_info: "सही योजनाएँ खोजने के लिए मुझे थोड़ी और जानकारी चाहिए। \
                     कृपया अपनी उम्र, राज्य, व्यवसाय और वार्षिक आय बताइए।",
    benefit_prefix: "लाभ",
};

fn scaffold_for(language: LanguageCode) -> &'static Scaffold {
    match language {
        LanguageCode::Hindi => &HINDI,
        _ => &ENGLISH,
    }
}

/// Composes the per-turn response text from ranked matches.
pub struct ResponseComposer;

impl ResponseComposer {
    /// Session-opening greeting.
    pub fn greeting(&self, language: LanguageCode) -> String {
        scaffold_for(language).greeting.to_string()
    }

    /// Compose the turn response over the top matches.
    ///
    /// Every listed match is numbered with its localized program name, score
    /// percentage, and one localized benefit line. An empty or all-zero
    /// result list becomes a prompt for more profile information.
    pub fn compose(
        &self,
        matches: &[MatchResult],
        catalog: &Catalog,
        language: LanguageCode,
    ) -> String {
        let scaffold = scaffold_for(language);

        if matches.iter().all(|m| m.score <= 0.0) {
            return scaffold.need_more_info.to_string();
        }

        let mut lines = vec![scaffold.results_intro.to_string()];
        for (rank, result) in matches.iter().enumerate() {
            let (name, benefit) = match catalog.lookup(&result.program_id) {
                Some(program) => (
                    program.name.get(language).to_string(),
                    Some(program.benefit_summary.get(language).to_string()),
                ),
                // Scored from this catalog, so always present; keep the
                // English name as a harmless fallback
                None => (result.program_name.clone(), None),
            };

            let qualifier = if result.fully_eligible {
                scaffold.fully_eligible.to_string()
            } else {
                format!("{}% {}", (result.score * 100.0).round() as u32, scaffold.partial_match)
            };
            lines.push(format!("{}. {} ({})", rank + 1, name, qualifier));
            if let Some(benefit) = benefit {
                lines.push(format!("   {}: {}", scaffold.benefit_prefix, benefit));
            }
        }
        lines.join("\n")
    }
}
