use crate::attempt::QuizAttempt;
use crate::error::{Error, Result};
use crate::models::document::DocumentReference;
use crate::models::question::{QAItem, QuizQuestion};
use crate::models::quiz_config::QuizConfig;
use crate::services::analysis::AnalysisService;
use validator::Validate;

/// The single active step of a session. Exactly one at a time; every
/// transition handler matches exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStep {
    Upload,
    ReviewAnswers,
    ConfigureQuiz,
    GeneratingQuiz,
    TakeQuiz,
}

/// Ticket handed out when a network call starts. A completion carrying a
/// ticket from a previous epoch (i.e. issued before a reset) is discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    epoch: u64,
}

/// Session state machine: owns the uploaded document, the extracted
/// answers, the generated quiz and its configuration, and drives the
/// upload -> review -> configure -> generate -> take-quiz sequence.
///
/// Network calls are split into a `begin_*` / `complete_*` pair so the
/// presentation layer can await the AI service however it likes while the
/// machine enforces the single-in-flight and stale-response rules. The
/// `run_*` helpers tie the two phases together for straight-line callers.
#[derive(Debug)]
pub struct QuizSession {
    step: SessionStep,
    document: Option<DocumentReference>,
    qa_items: Vec<QAItem>,
    quiz_questions: Vec<QuizQuestion>,
    quiz_config: Option<QuizConfig>,
    loading: bool,
    error: Option<String>,
    epoch: u64,
}

impl QuizSession {
    pub fn new() -> Self {
        Self {
            step: SessionStep::Upload,
            document: None,
            qa_items: Vec::new(),
            quiz_questions: Vec::new(),
            quiz_config: None,
            loading: false,
            error: None,
            epoch: 0,
        }
    }

    pub fn step(&self) -> SessionStep {
        self.step
    }

    pub fn document(&self) -> Option<&DocumentReference> {
        self.document.as_ref()
    }

    pub fn qa_items(&self) -> &[QAItem] {
        &self.qa_items
    }

    pub fn quiz_questions(&self) -> &[QuizQuestion] {
        &self.quiz_questions
    }

    pub fn quiz_config(&self) -> Option<&QuizConfig> {
        self.quiz_config.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The message from the most recent failed AI call, cleared by the
    /// next user action.
    pub fn last_error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn select_document(&mut self, document: DocumentReference) -> Result<()> {
        self.guard_interactive(SessionStep::Upload, "select a document")?;
        self.document = Some(document);
        self.error = None;
        Ok(())
    }

    pub fn clear_document(&mut self) -> Result<()> {
        self.guard_interactive(SessionStep::Upload, "clear the document")?;
        self.document = None;
        self.error = None;
        Ok(())
    }

    /// Starts the answer-extraction call. Returns the ticket to pass back
    /// to [`complete_analysis`](Self::complete_analysis) together with the
    /// document to analyze.
    pub fn begin_analysis(&mut self) -> Result<(RequestTicket, DocumentReference)> {
        self.guard_interactive(SessionStep::Upload, "request analysis")?;
        let document = self
            .document
            .clone()
            .ok_or_else(|| Error::InvalidState("No document selected".to_string()))?;
        self.loading = true;
        self.error = None;
        Ok((RequestTicket { epoch: self.epoch }, document))
    }

    /// Applies the outcome of an answer-extraction call. Success moves to
    /// `ReviewAnswers`; failure surfaces one message and stays in `Upload`.
    /// A stale ticket (session reset while the call was in flight) is
    /// discarded without touching state.
    pub fn complete_analysis(&mut self, ticket: RequestTicket, outcome: Result<Vec<QAItem>>) {
        if ticket.epoch != self.epoch {
            tracing::debug!("Discarding stale analysis response");
            return;
        }
        self.loading = false;
        match outcome {
            Ok(items) => {
                tracing::info!(count = items.len(), "Document analysis complete");
                self.qa_items = items;
                self.step = SessionStep::ReviewAnswers;
            }
            Err(e) => {
                tracing::error!(error = %e, "Document analysis failed");
                self.error = Some(e.to_string());
            }
        }
    }

    pub fn request_quiz_setup(&mut self) -> Result<()> {
        self.guard_interactive(SessionStep::ReviewAnswers, "configure a quiz")?;
        self.step = SessionStep::ConfigureQuiz;
        Ok(())
    }

    /// Validates and stores the configuration, then starts the generation
    /// call. Returns the ticket, the document, and the requested question
    /// count.
    pub fn begin_generation(
        &mut self,
        config: QuizConfig,
    ) -> Result<(RequestTicket, DocumentReference, u32)> {
        self.guard_interactive(SessionStep::ConfigureQuiz, "generate a quiz")?;
        config.validate()?;
        let document = self
            .document
            .clone()
            .ok_or_else(|| Error::InvalidState("No document selected".to_string()))?;
        let count = config.number_of_questions;
        self.quiz_config = Some(config);
        self.step = SessionStep::GeneratingQuiz;
        self.loading = true;
        self.error = None;
        Ok((RequestTicket { epoch: self.epoch }, document, count))
    }

    /// Applies the outcome of a generation call. Success moves to
    /// `TakeQuiz` with whatever question count the service returned;
    /// failure returns to `ConfigureQuiz` keeping the prior config
    /// visible. Stale tickets are discarded.
    pub fn complete_generation(
        &mut self,
        ticket: RequestTicket,
        outcome: Result<Vec<QuizQuestion>>,
    ) {
        if ticket.epoch != self.epoch {
            tracing::debug!("Discarding stale generation response");
            return;
        }
        self.loading = false;
        match outcome {
            Ok(questions) => {
                tracing::info!(count = questions.len(), "Quiz generated");
                self.quiz_questions = questions;
                self.step = SessionStep::TakeQuiz;
            }
            Err(e) => {
                tracing::error!(error = %e, "Quiz generation failed");
                self.error = Some(e.to_string());
                self.step = SessionStep::ConfigureQuiz;
            }
        }
    }

    pub async fn run_analysis<S>(&mut self, service: &S) -> Result<()>
    where
        S: AnalysisService + ?Sized,
    {
        let (ticket, document) = self.begin_analysis()?;
        let outcome = service.extract_answers(&document).await;
        self.complete_analysis(ticket, outcome);
        Ok(())
    }

    pub async fn run_generation<S>(&mut self, service: &S, config: QuizConfig) -> Result<()>
    where
        S: AnalysisService + ?Sized,
    {
        let (ticket, document, count) = self.begin_generation(config)?;
        let outcome = service.generate_quiz(&document, count).await;
        self.complete_generation(ticket, outcome);
        Ok(())
    }

    /// Builds the attempt engine for the generated quiz.
    pub fn start_attempt(&self) -> Result<QuizAttempt> {
        if self.step != SessionStep::TakeQuiz {
            return Err(Error::InvalidState(
                "No quiz is ready to be taken".to_string(),
            ));
        }
        let config = self
            .quiz_config
            .as_ref()
            .ok_or_else(|| Error::InvalidState("Quiz configuration missing".to_string()))?;
        Ok(QuizAttempt::new(
            self.quiz_questions.clone(),
            config.duration_minutes,
        ))
    }

    /// Full wipe back to the upload step. Bumps the epoch so any response
    /// still in flight lands on a stale ticket and is discarded.
    pub fn reset(&mut self) {
        self.step = SessionStep::Upload;
        self.document = None;
        self.qa_items.clear();
        self.quiz_questions.clear();
        self.quiz_config = None;
        self.loading = false;
        self.error = None;
        self.epoch += 1;
    }

    fn guard_interactive(&self, expected: SessionStep, action: &str) -> Result<()> {
        if self.loading {
            return Err(Error::InvalidState(format!(
                "Cannot {} while a request is in flight",
                action
            )));
        }
        if self.step != expected {
            return Err(Error::InvalidState(format!(
                "Cannot {} from the {:?} step",
                action, self.step
            )));
        }
        Ok(())
    }
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}
