use std::collections::HashMap;

use dottie_core::RawAnswers;
use tracing::warn;

/// Builds answers from a flat session-storage dump.
///
/// `symptoms` is stored as a JSON array string; anything unparseable is
/// treated as no symptoms.
pub fn answers_from_session(entries: &HashMap<String, String>) -> RawAnswers {
    let field = |key: &str| entries.get(key).cloned();

    RawAnswers {
        age: field("age"),
        cycle_length: field("cycleLength"),
        period_duration: field("periodDuration"),
        flow_heaviness: field("flowHeaviness").or_else(|| field("flowLevel")),
        pain_level: field("painLevel"),
        symptoms: entries
            .get("symptoms")
            .map(|raw| parse_symptoms(raw))
            .unwrap_or_default(),
        cycle_predictable: field("cyclePredictable"),
    }
}

pub fn parse_symptoms(raw: &str) -> Vec<String> {
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(symptoms) => symptoms,
        Err(error) => {
            warn!(%error, "unreadable stored symptoms; treating as none");
            Vec::new()
        }
    }
}
