use crate::models::question::QuizQuestion;
use crate::scheduler::{ScheduleHandle, Scheduler};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptPhase {
    InProgress,
    Submitted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerDetail {
    pub question_id: i32,
    pub selected_option: Option<usize>,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptResult {
    pub score: u32,
    pub total: u32,
    pub percentage: u32,
    pub details: Vec<AnswerDetail>,
}

/// One timed run over a fixed question list. Holds the answer map and the
/// countdown; `tick` is driven externally once per second so the engine
/// itself stays synchronous and deterministic.
#[derive(Debug)]
pub struct QuizAttempt {
    questions: Vec<QuizQuestion>,
    duration_minutes: u32,
    time_left_seconds: u32,
    answers: HashMap<i32, usize>,
    phase: AttemptPhase,
    result: Option<AttemptResult>,
}

impl QuizAttempt {
    pub fn new(questions: Vec<QuizQuestion>, duration_minutes: u32) -> Self {
        Self {
            questions,
            duration_minutes,
            time_left_seconds: duration_minutes * 60,
            answers: HashMap::new(),
            phase: AttemptPhase::InProgress,
            result: None,
        }
    }

    pub fn phase(&self) -> AttemptPhase {
        self.phase
    }

    pub fn is_submitted(&self) -> bool {
        self.phase == AttemptPhase::Submitted
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn answers(&self) -> &HashMap<i32, usize> {
        &self.answers
    }

    pub fn time_left_seconds(&self) -> u32 {
        self.time_left_seconds
    }

    pub fn result(&self) -> Option<&AttemptResult> {
        self.result.as_ref()
    }

    /// Records an answer. Ignores unknown question ids, out-of-range option
    /// indexes, and any call after submission; none of these are faults.
    pub fn select_option(&mut self, question_id: i32, option_index: usize) {
        if self.phase == AttemptPhase::Submitted {
            return;
        }
        let Some(question) = self.questions.iter().find(|q| q.id == question_id) else {
            tracing::warn!(question_id, "Answer for unknown question ignored");
            return;
        };
        if option_index >= question.options.len() {
            tracing::warn!(question_id, option_index, "Out-of-range option ignored");
            return;
        }
        self.answers.insert(question_id, option_index);
    }

    /// One second of countdown. Reaching zero forces a submission; further
    /// ticks are no-ops, so a stale timer callback can never double-submit.
    pub fn tick(&mut self) {
        if self.phase == AttemptPhase::Submitted {
            return;
        }
        self.time_left_seconds = self.time_left_seconds.saturating_sub(1);
        if self.time_left_seconds == 0 {
            self.submit();
        }
    }

    /// Grades the attempt and moves to `Submitted`. Idempotent: a second
    /// call leaves the stored result and answer map untouched.
    pub fn submit(&mut self) {
        if self.phase == AttemptPhase::Submitted {
            return;
        }

        let mut score: u32 = 0;
        let mut details = Vec::with_capacity(self.questions.len());
        for q in &self.questions {
            let selected = self.answers.get(&q.id).copied();
            let correct = match q.valid_answer_index() {
                Some(idx) => Some(idx),
                None => {
                    tracing::warn!(
                        question_id = q.id,
                        correct_answer_index = q.correct_answer_index,
                        options = q.options.len(),
                        "Correct answer index out of range; question can never score"
                    );
                    None
                }
            };
            let is_correct = selected.is_some() && selected == correct;
            if is_correct {
                score += 1;
            }
            details.push(AnswerDetail {
                question_id: q.id,
                selected_option: selected,
                is_correct,
            });
        }

        let total = self.questions.len() as u32;
        let percentage = if total == 0 {
            0
        } else {
            ((score as f64 / total as f64) * 100.0).round() as u32
        };

        self.result = Some(AttemptResult {
            score,
            total,
            percentage,
            details,
        });
        self.phase = AttemptPhase::Submitted;
    }

    /// Starts the attempt over: empty answer map, full clock, score
    /// discarded. Only meaningful from `Submitted`.
    pub fn retake(&mut self) {
        if self.phase != AttemptPhase::Submitted {
            return;
        }
        self.answers.clear();
        self.result = None;
        self.time_left_seconds = self.duration_minutes * 60;
        self.phase = AttemptPhase::InProgress;
    }

    /// Answered fraction in `[0, 1]`. An empty quiz reports `0.0` rather
    /// than dividing by zero.
    pub fn progress(&self) -> f64 {
        if self.questions.is_empty() {
            return 0.0;
        }
        self.answers.len() as f64 / self.questions.len() as f64
    }
}

/// `QuizAttempt` wired to a real clock. Owns the single schedule handle and
/// cancels it on submit, retake restart, and drop, so no tick outlives the
/// phase it was scheduled for.
pub struct TimedAttempt {
    attempt: Arc<Mutex<QuizAttempt>>,
    handle: Option<ScheduleHandle>,
}

impl TimedAttempt {
    pub fn start(attempt: QuizAttempt, scheduler: &dyn Scheduler) -> Self {
        let mut timed = Self {
            attempt: Arc::new(Mutex::new(attempt)),
            handle: None,
        };
        timed.start_clock(scheduler);
        timed
    }

    fn start_clock(&mut self, scheduler: &dyn Scheduler) {
        self.stop_clock();
        let shared = Arc::clone(&self.attempt);
        let handle = scheduler.schedule_repeating(
            Duration::from_secs(1),
            Box::new(move || {
                let mut attempt = lock(&shared);
                attempt.tick();
                // Returning false retires the schedule after auto-submit.
                !attempt.is_submitted()
            }),
        );
        self.handle = Some(handle);
    }

    fn stop_clock(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.cancel();
        }
    }

    pub fn select_option(&self, question_id: i32, option_index: usize) {
        lock(&self.attempt).select_option(question_id, option_index);
    }

    pub fn submit(&mut self) {
        lock(&self.attempt).submit();
        self.stop_clock();
    }

    pub fn retake(&mut self, scheduler: &dyn Scheduler) {
        {
            let mut attempt = lock(&self.attempt);
            if !attempt.is_submitted() {
                return;
            }
            attempt.retake();
        }
        self.start_clock(scheduler);
    }

    pub fn is_submitted(&self) -> bool {
        lock(&self.attempt).is_submitted()
    }

    pub fn time_left_seconds(&self) -> u32 {
        lock(&self.attempt).time_left_seconds()
    }

    pub fn progress(&self) -> f64 {
        lock(&self.attempt).progress()
    }

    pub fn result(&self) -> Option<AttemptResult> {
        lock(&self.attempt).result().cloned()
    }

    /// Read access to the underlying engine for anything not covered by
    /// the convenience accessors.
    pub fn with<R>(&self, f: impl FnOnce(&QuizAttempt) -> R) -> R {
        f(&lock(&self.attempt))
    }
}

impl Drop for TimedAttempt {
    fn drop(&mut self) {
        self.stop_clock();
    }
}

fn lock(attempt: &Arc<Mutex<QuizAttempt>>) -> MutexGuard<'_, QuizAttempt> {
    attempt.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
