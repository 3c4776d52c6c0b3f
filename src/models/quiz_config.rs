use serde::{Deserialize, Serialize};
use validator::Validate;

/// Per-quiz configuration captured once at the configuration step and
/// immutable afterwards. Validated before any generation call is made.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct QuizConfig {
    #[validate(range(min = 1, message = "at least one question is required"))]
    pub number_of_questions: u32,
    #[validate(range(min = 1, message = "duration must be at least one minute"))]
    pub duration_minutes: u32,
}
