use std::collections::HashSet;

use crate::models::{Pattern, PatternInfo, Recommendation};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("pattern `{0}` has no recommendations")]
    NoRecommendations(Pattern),
    #[error("pattern `{pattern}` repeats recommendation `{title}`")]
    DuplicateRecommendation { pattern: Pattern, title: String },
}

static REGULAR: PatternInfo = PatternInfo {
    pattern: Pattern::Regular,
    title: "Regular Menstrual Cycles",
    description:
        "Your menstrual cycles follow a normal, healthy pattern according to ACOG guidelines.",
    recommendations: &[
        Recommendation::authored(
            "Track Your Cycle",
            "Regular tracking will help you understand your patterns better and predict your next period.",
        ),
        Recommendation::authored(
            "Exercise Regularly",
            "Light to moderate exercise can help reduce menstrual pain and improve mood.",
        ),
        Recommendation::authored(
            "Maintain a Balanced Diet",
            "Foods rich in iron, calcium, and omega-3 fatty acids can help manage period symptoms.",
        ),
        Recommendation::authored(
            "Prioritize Sleep",
            "Aim for 8-10 hours of sleep, especially during your period when fatigue is common.",
        ),
    ],
};

static IRREGULAR: PatternInfo = PatternInfo {
    pattern: Pattern::Irregular,
    title: "Irregular Timing Pattern",
    description:
        "Your cycle length is outside the typical range, which may indicate hormonal fluctuations.",
    recommendations: &[
        Recommendation::authored(
            "Track Your Cycle",
            "Keeping a detailed record can help identify patterns and share with healthcare providers.",
        ),
        Recommendation::authored(
            "Consult a Healthcare Provider",
            "If your cycles are consistently irregular, consider discussing with a healthcare provider.",
        ),
        Recommendation::authored(
            "Focus on Nutrition",
            "A balanced diet can help support hormonal balance and regulate cycles.",
        ),
        Recommendation::authored(
            "Stress Management",
            "High stress can affect your cycle. Consider yoga, meditation, or other relaxation techniques.",
        ),
    ],
};

static HEAVY: PatternInfo = PatternInfo {
    pattern: Pattern::Heavy,
    title: "Heavy or Prolonged Flow Pattern",
    description:
        "Your flow is heavier or longer than typical, which could impact your daily activities.",
    recommendations: &[
        Recommendation::authored(
            "Iron-rich Foods",
            "Include lean red meat, spinach, beans, and fortified cereals to prevent iron deficiency.",
        ),
        Recommendation::authored(
            "Stay Hydrated",
            "Drink plenty of water to help replace fluids lost during your period.",
        ),
        Recommendation::authored(
            "Medical Evaluation",
            "If your flow regularly soaks through pads/tampons hourly, consult a healthcare provider.",
        ),
        Recommendation::authored(
            "Plan Ahead",
            "Keep extra supplies and a change of clothes available during heavy flow days.",
        ),
    ],
};

static PAIN: PatternInfo = PatternInfo {
    pattern: Pattern::Pain,
    title: "Pain-Predominant Pattern",
    description:
        "Your menstrual pain is higher than typical and may interfere with daily activities.",
    recommendations: &[
        Recommendation::authored(
            "Heat Therapy",
            "Apply a heating pad to your lower abdomen to help relieve menstrual cramps.",
        ),
        Recommendation::authored(
            "Pain Management",
            "Over-the-counter pain relievers like ibuprofen can help reduce pain and inflammation.",
        ),
        Recommendation::authored(
            "Gentle Exercise",
            "Light activities like walking or stretching can help alleviate menstrual pain.",
        ),
        Recommendation::authored(
            "Medical Support",
            "If pain is severe, talk to a healthcare provider about additional treatment options.",
        ),
    ],
};

static DEVELOPING: PatternInfo = PatternInfo {
    pattern: Pattern::Developing,
    title: "Developing Pattern",
    description:
        "Your cycles are still establishing a regular pattern, which is normal during adolescence.",
    recommendations: &[
        Recommendation::authored(
            "Be Patient",
            "It's normal for your cycle to be irregular during adolescence. It can take 2-3 years to establish a regular pattern.",
        ),
        Recommendation::authored(
            "Track Your Cycle",
            "Start keeping a record of your periods to observe patterns as they develop.",
        ),
        Recommendation::authored(
            "Learn About Your Body",
            "Understanding menstrual health can help you recognize what's normal for you.",
        ),
        Recommendation::authored(
            "Talk to Someone You Trust",
            "Discuss concerns with a parent, school nurse, or healthcare provider.",
        ),
    ],
};

pub fn pattern_info(pattern: Pattern) -> &'static PatternInfo {
    match pattern {
        Pattern::Regular => &REGULAR,
        Pattern::Irregular => &IRREGULAR,
        Pattern::Heavy => &HEAVY,
        Pattern::Pain => &PAIN,
        Pattern::Developing => &DEVELOPING,
    }
}

/// Authored recommendations for a pattern, in display order.
pub fn recommendations_for(pattern: Pattern) -> &'static [Recommendation] {
    pattern_info(pattern).recommendations
}

/// Fails when any pattern's entry is unusable. Run once at startup.
pub fn verify_catalog() -> Result<(), CatalogError> {
    for pattern in Pattern::ALL {
        let info = pattern_info(pattern);
        if info.recommendations.is_empty() {
            return Err(CatalogError::NoRecommendations(pattern));
        }

        let mut seen = HashSet::new();
        for recommendation in info.recommendations {
            if !seen.insert(recommendation.title.as_ref()) {
                return Err(CatalogError::DuplicateRecommendation {
                    pattern,
                    title: recommendation.title.to_string(),
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_is_complete() {
        assert_eq!(verify_catalog(), Ok(()));
        for pattern in Pattern::ALL {
            assert_eq!(pattern_info(pattern).pattern, pattern);
            assert_eq!(recommendations_for(pattern).len(), 4);
        }
    }

    #[test]
    fn lookup_returns_the_same_slice() {
        let first = recommendations_for(Pattern::Heavy);
        let second = recommendations_for(Pattern::Heavy);
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn keeps_authored_order() {
        let titles = recommendations_for(Pattern::Pain)
            .iter()
            .map(|recommendation| recommendation.title.as_ref())
            .collect::<Vec<_>>();
        assert_eq!(
            titles,
            [
                "Heat Therapy",
                "Pain Management",
                "Gentle Exercise",
                "Medical Support"
            ]
        );
    }
}
