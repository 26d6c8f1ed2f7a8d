pub mod answers;
pub mod assessment;
pub mod catalog;
pub mod chat;
pub mod classifier;
pub mod models;
pub mod normalize;

pub use answers::{AgeRange, CycleLength, FlowHeaviness, PainLevel, PeriodDuration, Predictability};
pub use assessment::{AnswerSnapshot, AssessmentError, AssessmentResult, Symptoms};
pub use catalog::{pattern_info, recommendations_for, verify_catalog, CatalogError};
pub use chat::chat_seed;
pub use classifier::{classify, classify_with_trace, Classification, DecisionStep, MatchSource, Rule};
pub use models::*;
pub use normalize::{contains_any, normalize};
