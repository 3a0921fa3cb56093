use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{
    AnswerState, Bookmark, BookmarkCategory, BookmarkManager, BookmarkToggle, IncorrectLog,
    Question, QuestionHash, SessionProgress, SessionState, Simulado,
};

/// Extra alternative appended to every question; always scored as incorrect.
pub const DONT_KNOW_OPTION: &str = "Não sei";

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EngineError {
    #[error("simulado has no questions")]
    Empty,

    #[error("no question matches hash {hash}")]
    QuestionNotFound { hash: QuestionHash },
}

//
// ─── OUTCOMES ─────────────────────────────────────────────────────────────────
//

/// How a session ends: a full run with score and review loop, or a
/// one-question study session that never reviews.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionPolicy {
    Standard,
    SingleQuestion,
}

/// Phase of the engine's state machine.
///
/// Review transitions are not a stored phase: they surface as
/// `AdvanceOutcome::ReviewStarted` while the engine moves straight back to
/// `Presenting`, so the review notice and the first review question render
/// together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnginePhase {
    /// A question is on screen; selection is open until confirmation.
    Presenting,
    /// The current answer was evaluated; waiting for advance.
    Answered,
    /// Terminal. No further transitions.
    Completed,
}

/// Everything the renderer needs to show feedback for a confirmed answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub question_hash: QuestionHash,
    pub is_correct: bool,
    /// The "I don't know" sentinel was chosen.
    pub skipped: bool,
    pub selected_option: String,
    pub correct_option: String,
    pub explanation: String,
}

/// Result of advancing past a confirmed answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// The next question of the current pass is being presented.
    Next,
    /// The pass ended with missed questions; a review pass over them begins.
    ReviewStarted { remaining: usize },
    /// The session is over.
    Finished(FinalSummary),
}

/// End-of-session summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalSummary {
    pub score: u32,
    /// Size of the original question set, not of the last review pass.
    pub total: usize,
    pub percentage: u32,
    pub policy: CompletionPolicy,
    pub bookmarks: Vec<Bookmark>,
    pub completed_at: DateTime<Utc>,
}

/// Bookmark change for the current question, ready for persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookmarkUpdate {
    pub question_hash: QuestionHash,
    pub statement: String,
    pub category: BookmarkCategory,
    pub toggle: BookmarkToggle,
}

//
// ─── ENGINE ───────────────────────────────────────────────────────────────────
//

/// State machine driving one quiz run.
///
/// Presents questions in order, evaluates confirmed answers, loops review
/// passes over missed questions until none remain, then completes. All
/// operations are synchronous and guarded: calls that are invalid for the
/// current phase are no-ops returning `false`/`None`, never errors.
#[derive(Debug, Clone)]
pub struct QuizEngine {
    simulado: Simulado,
    state: SessionState,
    incorrect_log: IncorrectLog,
    policy: CompletionPolicy,
    phase: EnginePhase,
    started_at: DateTime<Utc>,
    summary: Option<FinalSummary>,
}

impl QuizEngine {
    /// Starts a fresh session over the full question set.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Empty` if the simulado has no questions.
    pub fn new(simulado: Simulado, started_at: DateTime<Utc>) -> Result<Self, EngineError> {
        if simulado.question_count() == 0 {
            return Err(EngineError::Empty);
        }
        let state = SessionState::fresh(simulado.questions().to_vec());
        Ok(Self {
            simulado,
            state,
            incorrect_log: IncorrectLog::new(),
            policy: CompletionPolicy::Standard,
            phase: EnginePhase::Presenting,
            started_at,
            summary: None,
        })
    }

    /// Starts a one-question study session for a bookmarked question.
    ///
    /// The working set shrinks to the resolved question and the session ends
    /// after it regardless of correctness; review mode is never entered.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::QuestionNotFound` if the hash resolves to
    /// nothing in the current question set.
    pub fn study_single(
        simulado: Simulado,
        hash: QuestionHash,
        started_at: DateTime<Utc>,
    ) -> Result<Self, EngineError> {
        let question = simulado
            .find_by_hash(hash)
            .cloned()
            .ok_or(EngineError::QuestionNotFound { hash })?;
        let single = Simulado::new(
            simulado.id().clone(),
            simulado.title().to_string(),
            vec![question],
        );
        let state = SessionState::fresh(single.questions().to_vec());
        Ok(Self {
            simulado: single,
            state,
            incorrect_log: IncorrectLog::new(),
            policy: CompletionPolicy::SingleQuestion,
            phase: EnginePhase::Presenting,
            started_at,
            summary: None,
        })
    }

    /// Resumes a session from rehydrated state.
    ///
    /// Progress is saved before end-of-pass resolution, so a saved index may
    /// already sit past the working set; in that case the end-of-pass
    /// transition (review start or completion) applies immediately.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Empty` if the simulado has no questions.
    pub fn resume(
        simulado: Simulado,
        state: SessionState,
        now: DateTime<Utc>,
    ) -> Result<Self, EngineError> {
        if simulado.question_count() == 0 {
            return Err(EngineError::Empty);
        }
        let mut engine = Self {
            simulado,
            state,
            incorrect_log: IncorrectLog::new(),
            policy: CompletionPolicy::Standard,
            phase: EnginePhase::Presenting,
            started_at: now,
            summary: None,
        };
        if engine.state.pass_exhausted() {
            let _ = engine.resolve_position(now);
        }
        Ok(engine)
    }

    /// Replaces the engine's miss log with one loaded from storage.
    pub fn preload_incorrect_log(&mut self, log: IncorrectLog) {
        self.incorrect_log = log;
    }

    //
    // ─── OPERATIONS ───────────────────────────────────────────────────────
    //

    /// Selects (or re-selects) an option for the current question.
    ///
    /// Returns `false` without changing anything once the answer is
    /// confirmed or the session is over.
    pub fn select_option(&mut self, option: impl Into<String>) -> bool {
        if self.phase != EnginePhase::Presenting {
            return false;
        }
        self.state.set_answer(AnswerState::Selected(option.into()));
        true
    }

    /// Evaluates the selected option against the current question.
    ///
    /// Correct answers score outside review mode and shrink the incorrect
    /// list inside it; wrong or skipped answers join the incorrect list and
    /// the miss log. Returns `None` (no-op) without a selection or when the
    /// answer was already confirmed.
    pub fn confirm_answer(&mut self) -> Option<AnswerFeedback> {
        if self.phase != EnginePhase::Presenting {
            return None;
        }
        let AnswerState::Selected(selected) = self.state.answer().clone() else {
            return None;
        };
        let question = self.state.current_question()?.clone();

        let skipped = selected == DONT_KNOW_OPTION;
        let is_correct = !skipped && selected == question.correct_option();

        if is_correct {
            if self.state.is_review_mode() {
                self.state.clear_incorrect(question.hash());
            } else {
                self.state.add_score();
            }
        } else {
            self.state.push_incorrect(&question);
            self.incorrect_log.record(&question, self.simulado.id());
        }

        self.state
            .set_answer(AnswerState::Confirmed(selected.clone()));
        self.phase = EnginePhase::Answered;

        Some(AnswerFeedback {
            question_hash: question.hash(),
            is_correct,
            skipped,
            selected_option: selected,
            correct_option: question.correct_option().to_string(),
            explanation: question.explanation().to_string(),
        })
    }

    /// Moves past a confirmed answer and resolves what comes next.
    ///
    /// Returns `None` (no-op) unless the current answer is confirmed.
    pub fn advance(&mut self, now: DateTime<Utc>) -> Option<AdvanceOutcome> {
        if self.phase != EnginePhase::Answered {
            return None;
        }
        self.state.step();
        Some(self.resolve_position(now))
    }

    fn resolve_position(&mut self, now: DateTime<Utc>) -> AdvanceOutcome {
        if !self.state.pass_exhausted() {
            self.phase = EnginePhase::Presenting;
            return AdvanceOutcome::Next;
        }

        match self.policy {
            CompletionPolicy::SingleQuestion => AdvanceOutcome::Finished(self.finish(now)),
            CompletionPolicy::Standard => {
                if self.state.incorrect().is_empty() {
                    AdvanceOutcome::Finished(self.finish(now))
                } else {
                    self.state.enter_review();
                    self.phase = EnginePhase::Presenting;
                    AdvanceOutcome::ReviewStarted {
                        remaining: self.state.questions().len(),
                    }
                }
            }
        }
    }

    fn finish(&mut self, completed_at: DateTime<Utc>) -> FinalSummary {
        self.phase = EnginePhase::Completed;
        let total = self.simulado.question_count();
        let summary = FinalSummary {
            score: self.state.score(),
            total,
            percentage: percentage(self.state.score(), total),
            policy: self.policy,
            bookmarks: self.state.bookmarks().entries().to_vec(),
            completed_at,
        };
        self.summary = Some(summary.clone());
        summary
    }

    /// Toggles a bookmark on the question currently presented.
    ///
    /// Returns the resulting change for persistence, or `None` when no
    /// question is current.
    pub fn toggle_bookmark(&mut self, category: BookmarkCategory) -> Option<BookmarkUpdate> {
        if self.phase == EnginePhase::Completed {
            return None;
        }
        let question = self.state.current_question()?.clone();
        let toggle =
            self.state
                .bookmarks_mut()
                .toggle(question.hash(), category, question.statement());
        Some(BookmarkUpdate {
            question_hash: question.hash(),
            statement: question.statement().to_string(),
            category,
            toggle,
        })
    }

    //
    // ─── ACCESSORS ────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn simulado(&self) -> &Simulado {
        &self.simulado
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    #[must_use]
    pub fn policy(&self) -> CompletionPolicy {
        self.policy
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase == EnginePhase::Completed
    }

    #[must_use]
    pub fn is_review_mode(&self) -> bool {
        self.state.is_review_mode()
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.state.score()
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        if self.phase == EnginePhase::Completed {
            None
        } else {
            self.state.current_question()
        }
    }

    /// Alternatives to render for the current question, with the
    /// "I don't know" sentinel always appended last.
    #[must_use]
    pub fn presented_options(&self) -> Vec<String> {
        let Some(question) = self.current_question() else {
            return Vec::new();
        };
        let mut options = question.options().to_vec();
        options.push(DONT_KNOW_OPTION.to_string());
        options
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        self.state.progress()
    }

    #[must_use]
    pub fn bookmarks(&self) -> &BookmarkManager {
        self.state.bookmarks()
    }

    #[must_use]
    pub fn incorrect_log(&self) -> &IncorrectLog {
        &self.incorrect_log
    }

    /// Summary of a completed session, if the terminal state was reached.
    #[must_use]
    pub fn final_summary(&self) -> Option<&FinalSummary> {
        self.summary.as_ref()
    }
}

fn percentage(score: u32, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    // Scores and set sizes are small; the roundtrip through f64 is exact
    // enough for a display percentage.
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    {
        (f64::from(score) / total as f64 * 100.0).round() as u32
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
