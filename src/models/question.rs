use serde::{Deserialize, Serialize};

/// A question/answer pair extracted from the uploaded document.
/// Read-only once fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QAItem {
    pub question: String,
    pub answer: String,
}

/// A generated multiple-choice question. Wire shape matches the AI
/// response schema (camelCase fields, four options, one correct index).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: i32,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer_index: i64,
}

impl QuizQuestion {
    /// The correct option index, if the upstream service produced one that
    /// actually points into `options`. The AI service is untrusted input:
    /// an out-of-range index is kept as-is and the question simply can
    /// never be scored correct.
    pub fn valid_answer_index(&self) -> Option<usize> {
        if self.correct_answer_index < 0 {
            return None;
        }
        let idx = self.correct_answer_index as usize;
        if idx < self.options.len() {
            Some(idx)
        } else {
            None
        }
    }
}
