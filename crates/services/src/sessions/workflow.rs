use std::sync::Arc;
use std::time::Duration;

use log::warn;

use simulado_core::engine::{
    AdvanceOutcome, AnswerFeedback, BookmarkUpdate, CompletionPolicy, QuizEngine,
};
use simulado_core::model::{
    Bookmark, BookmarkCategory, IncorrectLog, QuestionHash, Simulado, SimuladoId,
};
use simulado_core::time::Clock;
use storage::repository::{
    BookmarkRecord, BookmarkRepository, IncorrectLogRepository, ProgressRecord,
    ProgressRepository, SimuladoRepository, SimuladoSummary,
};

use super::saver::ProgressSaver;
use super::view::SavedSessionItem;
use crate::error::SessionError;

//
// ─── SESSION START ────────────────────────────────────────────────────────────
//

/// Outcome of `begin`: a fresh engine, or saved progress awaiting the
/// user's explicit decision to continue or discard.
#[derive(Debug)]
pub enum SessionStart {
    Fresh(QuizEngine),
    Saved(PendingResume),
}

/// Everything fetched while checking for saved progress, held until the
/// user answers the continuation prompt.
#[derive(Debug)]
pub struct PendingResume {
    simulado: Simulado,
    record: ProgressRecord,
    incorrect_log: IncorrectLog,
}

impl PendingResume {
    #[must_use]
    pub fn simulado(&self) -> &Simulado {
        &self.simulado
    }

    /// The saved record, for the confirmation prompt ("question N of M").
    #[must_use]
    pub fn record(&self) -> &ProgressRecord {
        &self.record
    }
}

//
// ─── WORKFLOW ─────────────────────────────────────────────────────────────────
//

/// Orchestrates session start, persisted answering, and completion.
///
/// The engine stays authoritative and synchronous; every persistence write
/// triggered by an answer or advance runs on a spawned task and never blocks
/// or rolls back the in-memory state. Only the initial question-set load is
/// allowed to fail the whole flow.
#[derive(Clone)]
pub struct SessionLoopService {
    clock: Clock,
    simulados: Arc<dyn SimuladoRepository>,
    progress: Arc<dyn ProgressRepository>,
    bookmarks: Arc<dyn BookmarkRepository>,
    incorrect: Arc<dyn IncorrectLogRepository>,
    saver: ProgressSaver,
}

impl SessionLoopService {
    #[must_use]
    pub fn new(
        clock: Clock,
        simulados: Arc<dyn SimuladoRepository>,
        progress: Arc<dyn ProgressRepository>,
        bookmarks: Arc<dyn BookmarkRepository>,
        incorrect: Arc<dyn IncorrectLogRepository>,
    ) -> Self {
        let saver = ProgressSaver::new(Arc::clone(&progress));
        Self {
            clock,
            simulados,
            progress,
            bookmarks,
            incorrect,
            saver,
        }
    }

    /// Override the debounce quiet period for progress saves.
    #[must_use]
    pub fn with_save_delay(mut self, delay: Duration) -> Self {
        self.saver = self.saver.with_delay(delay);
        self
    }

    //
    // ─── STARTING ─────────────────────────────────────────────────────────
    //

    /// Load a simulado and check for a resumable run.
    ///
    /// The question-set load is the only fatal step. Failures fetching saved
    /// progress or the miss log degrade to a fresh session with a warning.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Load` if the simulado cannot be fetched, or
    /// `SessionError::Engine` if it validates to an empty set.
    pub async fn begin(&self, id: &SimuladoId) -> Result<SessionStart, SessionError> {
        let simulado = self
            .simulados
            .get_simulado(id)
            .await
            .map_err(SessionError::Load)?;

        let incorrect_log = match self.incorrect.load_log().await {
            Ok(log) => log,
            Err(err) => {
                warn!("could not load incorrect-answer log: {err}");
                IncorrectLog::new()
            }
        };

        let saved = match self.progress.load_progress(id).await {
            Ok(saved) => saved,
            Err(err) => {
                warn!("could not load saved progress for {id}: {err}");
                None
            }
        };

        if let Some(record) = saved {
            return Ok(SessionStart::Saved(PendingResume {
                simulado,
                record,
                incorrect_log,
            }));
        }

        let mut engine = QuizEngine::new(simulado, self.clock.now())?;
        engine.preload_incorrect_log(incorrect_log);
        Ok(SessionStart::Fresh(engine))
    }

    /// The user accepted the continuation prompt.
    ///
    /// If the saved index already sat past the end of its pass and nothing
    /// was missed, the resumed session completes on the spot and the
    /// completion flush runs.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Engine` if the simulado validates to an empty
    /// set.
    pub fn resume(&self, pending: PendingResume) -> Result<QuizEngine, SessionError> {
        let PendingResume {
            simulado,
            record,
            incorrect_log,
        } = pending;
        let state = record.into_session(&simulado);
        let mut engine = QuizEngine::resume(simulado, state, self.clock.now())?;
        engine.preload_incorrect_log(incorrect_log);
        if engine.is_complete() {
            self.spawn_completion_flush(
                engine.simulado().id().clone(),
                engine.incorrect_log().clone(),
            );
        }
        Ok(engine)
    }

    /// The user declined the continuation prompt: drop the stale record and
    /// start over.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Engine` if the simulado validates to an empty
    /// set.
    pub async fn discard(&self, pending: PendingResume) -> Result<QuizEngine, SessionError> {
        let PendingResume {
            simulado,
            incorrect_log,
            ..
        } = pending;
        if let Err(err) = self.progress.clear_progress(simulado.id()).await {
            warn!("could not clear saved progress for {}: {err}", simulado.id());
        }
        let mut engine = QuizEngine::new(simulado, self.clock.now())?;
        engine.preload_incorrect_log(incorrect_log);
        Ok(engine)
    }

    /// One-question study session for a bookmarked question.
    ///
    /// Saved progress is never consulted and never written: the degenerate
    /// session must not clobber a real run's record.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Load` if the simulado cannot be fetched, or
    /// `SessionError::Engine` if the hash resolves to nothing.
    pub async fn begin_single(
        &self,
        id: &SimuladoId,
        hash: QuestionHash,
    ) -> Result<QuizEngine, SessionError> {
        let simulado = self
            .simulados
            .get_simulado(id)
            .await
            .map_err(SessionError::Load)?;

        let incorrect_log = match self.incorrect.load_log().await {
            Ok(log) => log,
            Err(err) => {
                warn!("could not load incorrect-answer log: {err}");
                IncorrectLog::new()
            }
        };

        let mut engine = QuizEngine::study_single(simulado, hash, self.clock.now())?;
        engine.preload_incorrect_log(incorrect_log);
        Ok(engine)
    }

    //
    // ─── ANSWERING ────────────────────────────────────────────────────────
    //

    /// Confirm the selected answer; a miss fans out a log write.
    pub fn confirm_answer(&self, engine: &mut QuizEngine) -> Option<AnswerFeedback> {
        let feedback = engine.confirm_answer()?;
        if !feedback.is_correct {
            let log = engine.incorrect_log().clone();
            let incorrect = Arc::clone(&self.incorrect);
            tokio::spawn(async move {
                if let Err(err) = incorrect.save_log(&log).await {
                    warn!("failed to save incorrect-answer log: {err}");
                }
            });
        }
        Some(feedback)
    }

    /// Advance past a confirmed answer; persistence follows the outcome.
    ///
    /// `Next` and `ReviewStarted` queue a debounced progress save; a
    /// standard `Finished` cancels anything queued, flushes session stats,
    /// and clears the stored record. Single-question sessions never touch
    /// the progress store.
    pub fn advance(&self, engine: &mut QuizEngine) -> Option<AdvanceOutcome> {
        let outcome = engine.advance(self.clock.now())?;
        match &outcome {
            AdvanceOutcome::Next | AdvanceOutcome::ReviewStarted { .. } => {
                self.saver.schedule(
                    engine.simulado().id().clone(),
                    ProgressRecord::from_session(engine.state()),
                );
            }
            AdvanceOutcome::Finished(summary) => match summary.policy {
                CompletionPolicy::Standard => self.spawn_completion_flush(
                    engine.simulado().id().clone(),
                    engine.incorrect_log().clone(),
                ),
                CompletionPolicy::SingleQuestion => self.saver.cancel(),
            },
        }
        Some(outcome)
    }

    /// Explicit "save progress" action; the one save whose failure the user
    /// sees directly.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the write fails.
    pub async fn save_progress_now(&self, engine: &QuizEngine) -> Result<(), SessionError> {
        let record = ProgressRecord::from_session(engine.state());
        self.saver.flush_now(engine.simulado().id(), &record).await?;
        Ok(())
    }

    /// Toggle a bookmark on the current question and persist the change.
    pub fn toggle_bookmark(
        &self,
        engine: &mut QuizEngine,
        category: BookmarkCategory,
    ) -> Option<BookmarkUpdate> {
        let update = engine.toggle_bookmark(category)?;
        let id = engine.simulado().id().clone();
        let bookmarks = Arc::clone(&self.bookmarks);
        let change = update.clone();
        tokio::spawn(async move {
            let result = if change.toggle.is_bookmarked() {
                let bookmark = Bookmark {
                    question_hash: change.question_hash,
                    category: change.category,
                    statement: change.statement,
                };
                bookmarks
                    .save_bookmark(&BookmarkRecord::from_bookmark(&id, &bookmark))
                    .await
            } else {
                bookmarks.delete_bookmark(&id, change.question_hash).await
            };
            if let Err(err) = result {
                warn!("failed to persist bookmark change: {err}");
            }
        });
        Some(update)
    }

    fn spawn_completion_flush(&self, id: SimuladoId, log: IncorrectLog) {
        // Cancel before clearing, or a stale debounced write could
        // resurrect the record we are about to drop.
        self.saver.cancel();
        let progress = Arc::clone(&self.progress);
        let incorrect = Arc::clone(&self.incorrect);
        tokio::spawn(async move {
            if !log.is_empty() {
                if let Err(err) = incorrect.flush_stats(&log).await {
                    warn!("failed to flush session stats: {err}");
                }
            }
            if let Err(err) = progress.clear_progress(&id).await {
                warn!("failed to clear progress for {id}: {err}");
            }
        });
    }

    //
    // ─── QUERIES ──────────────────────────────────────────────────────────
    //

    /// The quiz catalog, for the home screen.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the catalog cannot be fetched.
    pub async fn simulados(&self) -> Result<Vec<SimuladoSummary>, SessionError> {
        Ok(self.simulados.list_simulados().await?)
    }

    /// Saved runs joined with catalog data; records for quizzes that no
    /// longer exist are already dropped by the store.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the store cannot be reached.
    pub async fn saved_sessions(&self) -> Result<Vec<SavedSessionItem>, SessionError> {
        let stored = self.progress.all_progress().await?;
        Ok(stored.into_iter().map(SavedSessionItem::from_stored).collect())
    }

    /// Drop a saved run from the home screen without starting the quiz.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the clear fails.
    pub async fn remove_saved_session(&self, id: &SimuladoId) -> Result<(), SessionError> {
        Ok(self.progress.clear_progress(id).await?)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
