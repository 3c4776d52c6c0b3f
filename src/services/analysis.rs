use crate::error::{Error, Result};
use crate::models::document::DocumentReference;
use crate::models::question::{QAItem, QuizQuestion};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value as JsonValue;

/// Document-understanding collaborator. Both calls take the document as
/// base64 payload plus MIME type and fail with `Error::Analysis` on
/// transport problems, empty responses, or malformed payloads.
#[async_trait]
pub trait AnalysisService: Send + Sync {
    async fn extract_answers(&self, document: &DocumentReference) -> Result<Vec<QAItem>>;

    /// May return a question count different from the requested one; the
    /// result is passed through as-is.
    async fn generate_quiz(
        &self,
        document: &DocumentReference,
        number_of_questions: u32,
    ) -> Result<Vec<QuizQuestion>>;
}

#[derive(Clone)]
pub struct GeminiAnalysisService {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiAnalysisService {
    pub fn new(api_key: String, model: String, client: Client) -> Self {
        Self {
            client,
            api_key,
            model,
        }
    }

    async fn generate_content(
        &self,
        document: &DocumentReference,
        prompt: &str,
        response_schema: JsonValue,
    ) -> Result<String> {
        let payload = serde_json::json!({
            "contents": {
                "parts": [
                    {
                        "inline_data": {
                            "mime_type": document.mime_type,
                            "data": document.payload
                        }
                    },
                    { "text": prompt }
                ]
            },
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": response_schema
            }
        });

        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent",
            self.model
        );

        let res = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::Analysis(format!("AI service unreachable: {}", e)))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(Error::Analysis(format!(
                "AI service error {}: {}",
                status, text
            )));
        }

        let body: JsonValue = res
            .json()
            .await
            .map_err(|e| Error::Analysis(format!("Unreadable AI response: {}", e)))?;

        body.get("candidates")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("content"))
            .and_then(|c| c.get("parts"))
            .and_then(|p| p.get(0))
            .and_then(|p| p.get("text"))
            .and_then(|t| t.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| Error::Analysis("AI service returned no text".to_string()))
    }
}

#[async_trait]
impl AnalysisService for GeminiAnalysisService {
    async fn extract_answers(&self, document: &DocumentReference) -> Result<Vec<QAItem>> {
        let schema = serde_json::json!({
            "type": "ARRAY",
            "items": {
                "type": "OBJECT",
                "properties": {
                    "question": { "type": "STRING", "description": "An exercise question found in the document" },
                    "answer": { "type": "STRING", "description": "The detailed answer to the question" }
                },
                "required": ["question", "answer"]
            }
        });

        let prompt = "You are a smart teaching assistant. Read the attached document.\n\
            1. Find every exercise question it contains.\n\
            2. If the document is pure theory, pose questions over the key content yourself.\n\
            3. Provide a precise answer with a short explanation for each question.\n\
            Return the result as JSON.";

        let raw = self.generate_content(document, prompt, schema).await?;
        parse_qa_items(&raw)
    }

    async fn generate_quiz(
        &self,
        document: &DocumentReference,
        number_of_questions: u32,
    ) -> Result<Vec<QuizQuestion>> {
        let schema = serde_json::json!({
            "type": "ARRAY",
            "items": {
                "type": "OBJECT",
                "properties": {
                    "id": { "type": "INTEGER" },
                    "question": { "type": "STRING" },
                    "options": {
                        "type": "ARRAY",
                        "items": { "type": "STRING" },
                        "description": "Four answer choices (A, B, C, D)"
                    },
                    "correctAnswerIndex": {
                        "type": "INTEGER",
                        "description": "Index of the correct choice within options (0-3)"
                    }
                },
                "required": ["id", "question", "options", "correctAnswerIndex"]
            }
        });

        let prompt = format!(
            "Based on the attached document, create a multiple-choice test.\n\
             Number of questions to create: {}.\n\n\
             Requirements:\n\
             1. The questions must cover the document's content.\n\
             2. Each question has exactly 4 choices.\n\
             3. Exactly one choice is correct.\n\
             4. Spread the difficulty from recall to application.\n\
             5. Return strictly valid JSON.",
            number_of_questions
        );

        let raw = self.generate_content(document, &prompt, schema).await?;
        parse_quiz_questions(&raw)
    }
}

/// Strict parse boundary for the answer-extraction payload.
pub fn parse_qa_items(raw: &str) -> Result<Vec<QAItem>> {
    serde_json::from_str(raw)
        .map_err(|e| Error::Analysis(format!("Malformed answer payload: {}", e)))
}

/// Strict parse boundary for the generated quiz. Questions with an
/// out-of-range correct index are kept (the upstream count passes through
/// untouched) but flagged here; scoring treats them as never-correct.
pub fn parse_quiz_questions(raw: &str) -> Result<Vec<QuizQuestion>> {
    let questions: Vec<QuizQuestion> = serde_json::from_str(raw)
        .map_err(|e| Error::Analysis(format!("Malformed quiz payload: {}", e)))?;

    for q in &questions {
        if q.valid_answer_index().is_none() {
            tracing::warn!(
                question_id = q.id,
                correct_answer_index = q.correct_answer_index,
                options = q.options.len(),
                "Generated question has an out-of-range correct index"
            );
        }
    }

    Ok(questions)
}
