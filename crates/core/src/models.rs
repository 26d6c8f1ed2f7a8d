use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::normalize::normalize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pattern {
    Regular,
    Irregular,
    Heavy,
    Pain,
    Developing,
}

impl Pattern {
    pub const ALL: [Pattern; 5] = [
        Self::Regular,
        Self::Irregular,
        Self::Heavy,
        Self::Pain,
        Self::Developing,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Irregular => "irregular",
            Self::Heavy => "heavy",
            Self::Pain => "pain",
            Self::Developing => "developing",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match normalize(Some(value)).as_str() {
            "regular" => Some(Self::Regular),
            "irregular" => Some(Self::Irregular),
            "heavy" => Some(Self::Heavy),
            "pain" => Some(Self::Pain),
            "developing" => Some(Self::Developing),
            _ => None,
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown pattern `{0}`")]
pub struct UnknownPattern(pub String);

impl FromStr for Pattern {
    type Err = UnknownPattern;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value).ok_or_else(|| UnknownPattern(value.to_string()))
    }
}

/// Unvalidated survey answers for one assessment attempt.
///
/// Keys follow the input supplier's camelCase names. Absent answers are
/// `None`; they are a valid input, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawAnswers {
    pub age: Option<String>,
    pub cycle_length: Option<String>,
    pub period_duration: Option<String>,
    #[serde(alias = "flowLevel")]
    pub flow_heaviness: Option<String>,
    pub pain_level: Option<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub symptoms: Vec<String>,
    pub cycle_predictable: Option<String>,
}

impl RawAnswers {
    /// True when no field carries any non-whitespace text.
    pub fn is_empty(&self) -> bool {
        let blank = |value: &Option<String>| {
            value
                .as_deref()
                .map(|value| value.trim().is_empty())
                .unwrap_or(true)
        };

        blank(&self.age)
            && blank(&self.cycle_length)
            && blank(&self.period_duration)
            && blank(&self.flow_heaviness)
            && blank(&self.pain_level)
            && blank(&self.cycle_predictable)
            && self.symptoms.iter().all(|symptom| symptom.trim().is_empty())
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: Cow<'static, str>,
    pub description: Cow<'static, str>,
}

impl Recommendation {
    pub const fn authored(title: &'static str, description: &'static str) -> Self {
        Self {
            title: Cow::Borrowed(title),
            description: Cow::Borrowed(description),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PatternInfo {
    pub pattern: Pattern,
    pub title: &'static str,
    pub description: &'static str,
    pub recommendations: &'static [Recommendation],
}
