use serde::{Deserialize, Serialize};

use crate::catalog::recommendations_for;
use crate::classifier::{classify_with_trace, Classification};
use crate::models::{Pattern, RawAnswers, Recommendation};
use crate::normalize::normalize;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssessmentError {
    #[error("missing required assessment field `{0}`")]
    MissingRequiredField(&'static str),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symptoms {
    pub physical: Vec<String>,
    pub emotional: Vec<String>,
}

/// Normalized copy of the answers, kept for display and persistence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSnapshot {
    pub age: String,
    pub cycle_length: String,
    pub period_duration: String,
    pub flow_heaviness: String,
    pub pain_level: String,
    pub cycle_predictable: String,
    pub symptoms: Symptoms,
}

impl AnswerSnapshot {
    pub fn from_answers(answers: &RawAnswers) -> Self {
        Self {
            age: normalize(answers.age.as_deref()),
            cycle_length: normalize(answers.cycle_length.as_deref()),
            period_duration: normalize(answers.period_duration.as_deref()),
            flow_heaviness: normalize(answers.flow_heaviness.as_deref()),
            pain_level: normalize(answers.pain_level.as_deref()),
            cycle_predictable: normalize(answers.cycle_predictable.as_deref()),
            symptoms: Symptoms {
                physical: answers
                    .symptoms
                    .iter()
                    .map(|symptom| symptom.trim())
                    .filter(|symptom| !symptom.is_empty())
                    .map(ToString::to_string)
                    .collect(),
                emotional: Vec::new(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentResult {
    pub pattern: Pattern,
    pub recommendations: Vec<Recommendation>,
    pub answers: AnswerSnapshot,
}

impl AssessmentResult {
    pub fn from_answers(answers: &RawAnswers) -> Self {
        Self::from_classification(answers, &classify_with_trace(answers))
    }

    pub fn from_classification(answers: &RawAnswers, classification: &Classification) -> Self {
        Self {
            pattern: classification.pattern,
            recommendations: recommendations_for(classification.pattern).to_vec(),
            answers: AnswerSnapshot::from_answers(answers),
        }
    }

    /// A stored result needs at least the age and cycle length answers.
    pub fn ensure_persistable(&self) -> Result<(), AssessmentError> {
        if self.answers.age.is_empty() {
            return Err(AssessmentError::MissingRequiredField("age"));
        }
        if self.answers.cycle_length.is_empty() {
            return Err(AssessmentError::MissingRequiredField("cycleLength"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answers() -> RawAnswers {
        RawAnswers {
            age: Some(" 18-24 ".to_string()),
            cycle_length: Some("26-30".to_string()),
            period_duration: Some("4-5".to_string()),
            flow_heaviness: Some("Heavy".to_string()),
            pain_level: Some("mild".to_string()),
            symptoms: vec![" Bloating ".to_string(), "  ".to_string()],
            cycle_predictable: None,
        }
    }

    #[test]
    fn builds_result_from_classification() {
        let result = AssessmentResult::from_answers(&answers());

        assert_eq!(result.pattern, Pattern::Heavy);
        assert_eq!(result.recommendations, recommendations_for(Pattern::Heavy));
        assert_eq!(result.answers.age, "18-24");
        assert_eq!(result.answers.flow_heaviness, "heavy");
        assert_eq!(result.answers.symptoms.physical, vec!["Bloating".to_string()]);
        assert!(result.answers.symptoms.emotional.is_empty());
    }

    #[test]
    fn requires_age_and_cycle_length_for_persistence() {
        assert_eq!(
            AssessmentResult::from_answers(&answers()).ensure_persistable(),
            Ok(())
        );

        let mut missing_cycle = answers();
        missing_cycle.cycle_length = Some("   ".to_string());
        assert_eq!(
            AssessmentResult::from_answers(&missing_cycle).ensure_persistable(),
            Err(AssessmentError::MissingRequiredField("cycleLength"))
        );

        assert_eq!(
            AssessmentResult::from_answers(&RawAnswers::default()).ensure_persistable(),
            Err(AssessmentError::MissingRequiredField("age"))
        );
    }

    // Unanswered fields are kept empty; display text for them belongs to the
    // renderer.
    #[test]
    fn unanswered_fields_stay_empty() {
        let mut partial = answers();
        partial.period_duration = None;
        partial.pain_level = Some("  ".to_string());

        let snapshot = AnswerSnapshot::from_answers(&partial);
        assert_eq!(snapshot.period_duration, "");
        assert_eq!(snapshot.pain_level, "");
        assert_eq!(snapshot.cycle_predictable, "");
    }

    #[test]
    fn survives_json_round_trip() {
        let result = AssessmentResult::from_answers(&answers());
        let json = serde_json::to_string(&result).unwrap();
        let parsed: AssessmentResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, result);
    }
}
