use crate::catalog::pattern_info;
use crate::models::Pattern;

/// Opening message handed to the chat assistant after an assessment.
pub fn chat_seed(pattern: Pattern) -> String {
    format!(
        "Hi! I've just completed my menstrual health assessment. My results show: {}. Can you tell me more about what this means?",
        pattern_info(pattern).title
    )
}
