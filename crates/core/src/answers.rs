//! Option slugs offered by the assessment form, parsed into enums.
//!
//! Each `parse` only accepts the exact slug (after normalization). Anything
//! else is left to the keyword path in the classifier.

use serde::{Deserialize, Serialize};

use crate::normalize::normalize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgeRange {
    #[serde(rename = "under-13")]
    Under13,
    #[serde(rename = "13-17")]
    Teen,
    #[serde(rename = "18-24")]
    YoungAdult,
    #[serde(rename = "25-plus")]
    Adult,
}

impl AgeRange {
    pub const ALL: [AgeRange; 4] = [Self::Under13, Self::Teen, Self::YoungAdult, Self::Adult];

    pub fn parse(value: &str) -> Option<Self> {
        match normalize(Some(value)).as_str() {
            "under-13" => Some(Self::Under13),
            "13-17" => Some(Self::Teen),
            "18-24" => Some(Self::YoungAdult),
            "25-plus" => Some(Self::Adult),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Under13 => "under-13",
            Self::Teen => "13-17",
            Self::YoungAdult => "18-24",
            Self::Adult => "25-plus",
        }
    }

    pub fn is_adolescent(self) -> bool {
        match self {
            Self::Under13 | Self::Teen => true,
            Self::YoungAdult | Self::Adult => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CycleLength {
    #[serde(rename = "less-than-21")]
    LessThan21,
    #[serde(rename = "21-25")]
    Days21To25,
    #[serde(rename = "26-30")]
    Days26To30,
    #[serde(rename = "31-35")]
    Days31To35,
    #[serde(rename = "36-40")]
    Days36To40,
    #[serde(rename = "irregular")]
    Irregular,
    #[serde(rename = "not-sure")]
    NotSure,
    #[serde(rename = "other")]
    Other,
}

impl CycleLength {
    pub const ALL: [CycleLength; 8] = [
        Self::LessThan21,
        Self::Days21To25,
        Self::Days26To30,
        Self::Days31To35,
        Self::Days36To40,
        Self::Irregular,
        Self::NotSure,
        Self::Other,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match normalize(Some(value)).as_str() {
            "less-than-21" => Some(Self::LessThan21),
            "21-25" => Some(Self::Days21To25),
            "26-30" => Some(Self::Days26To30),
            "31-35" => Some(Self::Days31To35),
            "36-40" => Some(Self::Days36To40),
            "irregular" => Some(Self::Irregular),
            "not-sure" => Some(Self::NotSure),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::LessThan21 => "less-than-21",
            Self::Days21To25 => "21-25",
            Self::Days26To30 => "26-30",
            Self::Days31To35 => "31-35",
            Self::Days36To40 => "36-40",
            Self::Irregular => "irregular",
            Self::NotSure => "not-sure",
            Self::Other => "other",
        }
    }

    /// Outside the 21-45 day window, or explicitly irregular.
    pub fn is_abnormal(self) -> bool {
        match self {
            Self::LessThan21 | Self::Irregular => true,
            Self::Days21To25
            | Self::Days26To30
            | Self::Days31To35
            | Self::Days36To40
            | Self::NotSure
            | Self::Other => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeriodDuration {
    #[serde(rename = "1-3")]
    Days1To3,
    #[serde(rename = "4-5")]
    Days4To5,
    #[serde(rename = "6-7")]
    Days6To7,
    #[serde(rename = "8-plus")]
    EightPlus,
    #[serde(rename = "varies")]
    Varies,
    #[serde(rename = "not-sure")]
    NotSure,
    #[serde(rename = "other")]
    Other,
}

impl PeriodDuration {
    pub const ALL: [PeriodDuration; 7] = [
        Self::Days1To3,
        Self::Days4To5,
        Self::Days6To7,
        Self::EightPlus,
        Self::Varies,
        Self::NotSure,
        Self::Other,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match normalize(Some(value)).as_str() {
            "1-3" => Some(Self::Days1To3),
            "4-5" => Some(Self::Days4To5),
            "6-7" => Some(Self::Days6To7),
            "8-plus" => Some(Self::EightPlus),
            "varies" => Some(Self::Varies),
            "not-sure" => Some(Self::NotSure),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Days1To3 => "1-3",
            Self::Days4To5 => "4-5",
            Self::Days6To7 => "6-7",
            Self::EightPlus => "8-plus",
            Self::Varies => "varies",
            Self::NotSure => "not-sure",
            Self::Other => "other",
        }
    }

    pub fn is_prolonged(self) -> bool {
        matches!(self, Self::EightPlus)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlowHeaviness {
    Light,
    Moderate,
    Heavy,
    VeryHeavy,
    Varies,
    NotSure,
}

impl FlowHeaviness {
    pub const ALL: [FlowHeaviness; 6] = [
        Self::Light,
        Self::Moderate,
        Self::Heavy,
        Self::VeryHeavy,
        Self::Varies,
        Self::NotSure,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match normalize(Some(value)).as_str() {
            "light" => Some(Self::Light),
            "moderate" => Some(Self::Moderate),
            "heavy" => Some(Self::Heavy),
            "very-heavy" => Some(Self::VeryHeavy),
            "varies" => Some(Self::Varies),
            "not-sure" => Some(Self::NotSure),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Moderate => "moderate",
            Self::Heavy => "heavy",
            Self::VeryHeavy => "very-heavy",
            Self::Varies => "varies",
            Self::NotSure => "not-sure",
        }
    }

    pub fn is_heavy(self) -> bool {
        matches!(self, Self::Heavy | Self::VeryHeavy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PainLevel {
    NoPain,
    Mild,
    Moderate,
    Severe,
    Debilitating,
    Varies,
}

impl PainLevel {
    pub const ALL: [PainLevel; 6] = [
        Self::NoPain,
        Self::Mild,
        Self::Moderate,
        Self::Severe,
        Self::Debilitating,
        Self::Varies,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match normalize(Some(value)).as_str() {
            "no-pain" => Some(Self::NoPain),
            "mild" => Some(Self::Mild),
            "moderate" => Some(Self::Moderate),
            "severe" => Some(Self::Severe),
            "debilitating" => Some(Self::Debilitating),
            "varies" => Some(Self::Varies),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoPain => "no-pain",
            Self::Mild => "mild",
            Self::Moderate => "moderate",
            Self::Severe => "severe",
            Self::Debilitating => "debilitating",
            Self::Varies => "varies",
        }
    }

    pub fn is_severe(self) -> bool {
        matches!(self, Self::Severe | Self::Debilitating)
    }
}

/// Whether the cycle has been predictable for at least three months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predictability {
    Yes,
    No,
}

impl Predictability {
    pub fn parse(value: &str) -> Option<Self> {
        match normalize(Some(value)).as_str() {
            "yes" | "true" => Some(Self::Yes),
            "no" | "false" => Some(Self::No),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_slugs_regardless_of_case() {
        assert_eq!(AgeRange::parse(" 13-17 "), Some(AgeRange::Teen));
        assert_eq!(CycleLength::parse("Irregular"), Some(CycleLength::Irregular));
        assert_eq!(FlowHeaviness::parse("VERY-HEAVY"), Some(FlowHeaviness::VeryHeavy));
        assert_eq!(Predictability::parse("True"), Some(Predictability::Yes));
    }

    #[test]
    fn free_text_is_not_a_slug() {
        assert_eq!(CycleLength::parse("26-30 days"), None);
        assert_eq!(PainLevel::parse("severe cramps"), None);
        assert_eq!(Predictability::parse("not sure"), None);
    }

    #[test]
    fn slugs_round_trip() {
        for age in AgeRange::ALL {
            assert_eq!(AgeRange::parse(age.as_str()), Some(age));
        }
        for length in CycleLength::ALL {
            assert_eq!(CycleLength::parse(length.as_str()), Some(length));
        }
        for duration in PeriodDuration::ALL {
            assert_eq!(PeriodDuration::parse(duration.as_str()), Some(duration));
        }
        for flow in FlowHeaviness::ALL {
            assert_eq!(FlowHeaviness::parse(flow.as_str()), Some(flow));
        }
        for pain in PainLevel::ALL {
            assert_eq!(PainLevel::parse(pain.as_str()), Some(pain));
        }
    }

    #[test]
    fn serde_uses_slugs() {
        assert_eq!(
            serde_json::to_string(&AgeRange::Adult).unwrap(),
            "\"25-plus\""
        );
        assert_eq!(
            serde_json::from_str::<FlowHeaviness>("\"very-heavy\"").unwrap(),
            FlowHeaviness::VeryHeavy
        );
    }
}
