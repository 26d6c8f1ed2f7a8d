use serde::Serialize;

use crate::answers::{
    AgeRange, CycleLength, FlowHeaviness, PainLevel, PeriodDuration, Predictability,
};
use crate::models::{Pattern, RawAnswers};
use crate::normalize::{contains_any, normalize};

const CYCLE_LENGTH_ABNORMAL: &[&str] = &[
    "irregular",
    "less than 21",
    "<21",
    "less-than-21",
    "more than 45",
    ">45",
    "45+",
];

const PERIOD_DURATION_PROLONGED: &[&str] =
    &["more than 7", "> 7", ">7", "8+", "8 days", "8-plus"];

const FLOW_HEAVY: &[&str] = &["heavy", "very heavy"];

const PAIN_SEVERE: &[&str] = &["severe", "debilitating"];

const NOT_PREDICTABLE: &[&str] = &["no", "false"];

const PREDICTABLE: &[&str] = &["yes", "true"];

const ADOLESCENT_AGE: &[&str] = &[
    "12-14",
    "15-17",
    "13-17",
    "12",
    "13",
    "14",
    "15",
    "16",
    "17",
    "teen",
    "adolescent",
];

/// One question of the triage chain, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    CycleLength,
    PeriodDuration,
    FlowHeaviness,
    PainLevel,
    Predictability,
    AgeFallback,
}

/// How a rule reached its verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchSource {
    /// The answer was a known option slug.
    Typed,
    /// Free text, matched against the keyword set.
    Keyword,
    /// No answer was given.
    Absent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DecisionStep {
    pub rule: Rule,
    pub matched: bool,
    pub source: MatchSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub pattern: Pattern,
    pub decided_by: Rule,
    pub path: Vec<DecisionStep>,
}

/// Maps one set of answers to exactly one pattern. Pure and total.
pub fn classify(answers: &RawAnswers) -> Pattern {
    classify_with_trace(answers).pattern
}

/// Same as [`classify`], keeping every rule that was evaluated.
///
/// The first matching rule wins; later rules are not evaluated and do not
/// appear in the path.
pub fn classify_with_trace(answers: &RawAnswers) -> Classification {
    let mut path = Vec::with_capacity(6);

    let chain: [(Rule, Pattern, Verdict); 4] = [
        (
            Rule::CycleLength,
            Pattern::Irregular,
            check(
                answers.cycle_length.as_deref(),
                CycleLength::parse,
                CycleLength::is_abnormal,
                CYCLE_LENGTH_ABNORMAL,
            ),
        ),
        (
            Rule::PeriodDuration,
            Pattern::Heavy,
            check(
                answers.period_duration.as_deref(),
                PeriodDuration::parse,
                PeriodDuration::is_prolonged,
                PERIOD_DURATION_PROLONGED,
            ),
        ),
        (
            Rule::FlowHeaviness,
            Pattern::Heavy,
            check(
                answers.flow_heaviness.as_deref(),
                FlowHeaviness::parse,
                FlowHeaviness::is_heavy,
                FLOW_HEAVY,
            ),
        ),
        (
            Rule::PainLevel,
            Pattern::Pain,
            check(
                answers.pain_level.as_deref(),
                PainLevel::parse,
                PainLevel::is_severe,
                PAIN_SEVERE,
            ),
        ),
    ];

    for (rule, pattern, verdict) in chain {
        path.push(verdict.step(rule));
        if verdict.matched {
            return Classification {
                pattern,
                decided_by: rule,
                path,
            };
        }
    }

    let (predictability, source) = predictability(answers.cycle_predictable.as_deref());
    path.push(DecisionStep {
        rule: Rule::Predictability,
        matched: predictability.is_some(),
        source,
    });
    match predictability {
        Some(Predictability::No) => {
            return Classification {
                pattern: Pattern::Developing,
                decided_by: Rule::Predictability,
                path,
            }
        }
        Some(Predictability::Yes) => {
            return Classification {
                pattern: Pattern::Regular,
                decided_by: Rule::Predictability,
                path,
            }
        }
        None => {}
    }

    let adolescent = check(
        answers.age.as_deref(),
        AgeRange::parse,
        AgeRange::is_adolescent,
        ADOLESCENT_AGE,
    );
    path.push(adolescent.step(Rule::AgeFallback));

    Classification {
        pattern: if adolescent.matched {
            Pattern::Developing
        } else {
            Pattern::Regular
        },
        decided_by: Rule::AgeFallback,
        path,
    }
}

#[derive(Debug, Clone, Copy)]
struct Verdict {
    matched: bool,
    source: MatchSource,
}

impl Verdict {
    fn step(self, rule: Rule) -> DecisionStep {
        DecisionStep {
            rule,
            matched: self.matched,
            source: self.source,
        }
    }
}

fn check<T>(
    value: Option<&str>,
    parse: fn(&str) -> Option<T>,
    typed: fn(T) -> bool,
    keywords: &[&str],
) -> Verdict {
    if normalize(value).is_empty() {
        return Verdict {
            matched: false,
            source: MatchSource::Absent,
        };
    }

    match value.and_then(parse) {
        Some(parsed) => Verdict {
            matched: typed(parsed),
            source: MatchSource::Typed,
        },
        None => Verdict {
            matched: contains_any(value, keywords),
            source: MatchSource::Keyword,
        },
    }
}

fn predictability(value: Option<&str>) -> (Option<Predictability>, MatchSource) {
    if normalize(value).is_empty() {
        return (None, MatchSource::Absent);
    }

    if let Some(parsed) = value.and_then(Predictability::parse) {
        return (Some(parsed), MatchSource::Typed);
    }

    // "no" is checked first, so "not sure" reads as not predictable.
    let parsed = if contains_any(value, NOT_PREDICTABLE) {
        Some(Predictability::No)
    } else if contains_any(value, PREDICTABLE) {
        Some(Predictability::Yes)
    } else {
        None
    };

    (parsed, MatchSource::Keyword)
}
