use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use simulado_core::model::{
    Bookmark, BookmarkManager, IncorrectEntry, IncorrectLog, Question, QuestionError,
    QuestionHash, SessionState, Simulado, SimuladoId,
};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("unexpected status: {0}")]
    Status(u16),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

//
// ─── PROGRESS RECORD ──────────────────────────────────────────────────────────
//

/// Persisted shape of a quiz run.
///
/// Carries only session scalars plus question hashes, never question bodies:
/// hashes are resolved against the freshly loaded question set on resume, so
/// edited sets degrade gracefully instead of resurrecting stale questions.
/// Every field defaults, tolerating partial records from older sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressRecord {
    pub current_question_index: usize,
    pub score: u32,
    pub is_review_mode: bool,
    pub incorrect_questions: Vec<QuestionHash>,
    /// Working set of the interrupted review pass; empty outside review mode.
    pub review_questions: Vec<QuestionHash>,
}

impl ProgressRecord {
    /// Captures the persistable part of a session.
    #[must_use]
    pub fn from_session(state: &SessionState) -> Self {
        Self {
            current_question_index: state.current_index(),
            score: state.score(),
            is_review_mode: state.is_review_mode(),
            incorrect_questions: state.incorrect().iter().map(Question::hash).collect(),
            review_questions: if state.is_review_mode() {
                state.questions().iter().map(Question::hash).collect()
            } else {
                Vec::new()
            },
        }
    }

    /// Rebuilds session state against the current question set.
    ///
    /// Hashes that no longer match any question are dropped silently; the
    /// question set may legitimately have changed since the save. Bookmarks
    /// live in their own store and are not part of this record.
    #[must_use]
    pub fn into_session(self, simulado: &Simulado) -> SessionState {
        let resolve = |hashes: &[QuestionHash]| -> Vec<Question> {
            hashes
                .iter()
                .filter_map(|hash| simulado.find_by_hash(*hash).cloned())
                .collect()
        };

        let incorrect = resolve(&self.incorrect_questions);
        let questions = if self.is_review_mode {
            resolve(&self.review_questions)
        } else {
            simulado.questions().to_vec()
        };

        SessionState::from_persisted(
            questions,
            self.current_question_index,
            self.score,
            incorrect,
            self.is_review_mode,
            BookmarkManager::new(),
        )
    }
}

//
// ─── BOOKMARK RECORD ──────────────────────────────────────────────────────────
//

/// Wire shape of one bookmark; the backend keys hashes as strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkRecord {
    pub simulado_id: SimuladoId,
    pub question_hash: String,
    pub enunciado: String,
    pub category: String,
}

impl BookmarkRecord {
    #[must_use]
    pub fn from_bookmark(simulado_id: &SimuladoId, bookmark: &Bookmark) -> Self {
        Self {
            simulado_id: simulado_id.clone(),
            question_hash: bookmark.question_hash.value().to_string(),
            enunciado: bookmark.statement.clone(),
            category: bookmark.category.as_str().to_string(),
        }
    }

    /// Convert the record back into a domain bookmark plus its quiz scope.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` for malformed hashes or unknown
    /// categories.
    pub fn into_bookmark(self) -> Result<(SimuladoId, Bookmark), StorageError> {
        let hash: i32 = self
            .question_hash
            .parse()
            .map_err(|_| StorageError::Serialization(format!("bad hash {:?}", self.question_hash)))?;
        let category = self
            .category
            .parse()
            .map_err(|_| StorageError::Serialization(format!("bad category {:?}", self.category)))?;
        Ok((
            self.simulado_id,
            Bookmark {
                question_hash: QuestionHash::from_raw(hash),
                category,
                statement: self.enunciado,
            },
        ))
    }
}

//
// ─── INCORRECT LOG RECORD ─────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncorrectEntryRecord {
    pub count: u32,
    pub enunciado: String,
    pub simulado_id: SimuladoId,
}

/// Wire shape of the miss log: stringified hash to accumulated entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IncorrectLogRecord(pub BTreeMap<String, IncorrectEntryRecord>);

impl IncorrectLogRecord {
    #[must_use]
    pub fn from_log(log: &IncorrectLog) -> Self {
        Self(
            log.iter()
                .map(|(hash, entry)| {
                    (
                        hash.value().to_string(),
                        IncorrectEntryRecord {
                            count: entry.count,
                            enunciado: entry.statement.clone(),
                            simulado_id: entry.simulado_id.clone(),
                        },
                    )
                })
                .collect(),
        )
    }

    /// Keys that do not parse as hashes are dropped; the log is advisory
    /// statistics, not session-critical state.
    #[must_use]
    pub fn into_log(self) -> IncorrectLog {
        IncorrectLog::from_entries(
            self.0
                .into_iter()
                .filter_map(|(key, record)| {
                    let hash: i32 = key.parse().ok()?;
                    Some((
                        QuestionHash::from_raw(hash),
                        IncorrectEntry {
                            count: record.count,
                            statement: record.enunciado,
                            simulado_id: record.simulado_id,
                        },
                    ))
                })
                .collect(),
        )
    }
}

//
// ─── SIMULADO SOURCE RECORDS ──────────────────────────────────────────────────
//

/// One question as served by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestaoRecord {
    pub enunciado: String,
    pub alternativas: Vec<String>,
    pub alternativa_correta: String,
    #[serde(default)]
    pub explicacao: String,
}

impl QuestaoRecord {
    /// Validate into a domain question at its source position.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the alternatives are empty, the correct
    /// alternative is missing from them, or it collides with the sentinel.
    pub fn into_question(self, index: usize) -> Result<Question, QuestionError> {
        Question::new(
            self.enunciado,
            self.alternativas,
            self.alternativa_correta,
            self.explicacao,
            index,
        )
    }
}

/// A full quiz set as served by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimuladoRecord {
    pub id: SimuladoId,
    pub titulo: String,
    pub questoes: Vec<QuestaoRecord>,
}

impl SimuladoRecord {
    /// Validate the whole set into a domain `Simulado`.
    ///
    /// # Errors
    ///
    /// Returns the first `QuestionError` hit while validating questions.
    pub fn into_simulado(self) -> Result<Simulado, QuestionError> {
        let questions = self
            .questoes
            .into_iter()
            .enumerate()
            .map(|(index, record)| record.into_question(index))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Simulado::new(self.id, self.titulo, questions))
    }
}

/// Catalog entry for the quiz list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimuladoSummary {
    pub id: SimuladoId,
    pub titulo: String,
    #[serde(default)]
    pub descricao: String,
    pub questoes_count: usize,
}

/// One saved run joined with its quiz catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredProgress {
    pub simulado_id: SimuladoId,
    pub titulo: String,
    #[serde(default)]
    pub descricao: String,
    pub questoes_count: usize,
    pub progress: ProgressRecord,
}

//
// ─── REPOSITORY CONTRACTS ─────────────────────────────────────────────────────
//

/// Read access to the quiz catalog.
#[async_trait]
pub trait SimuladoRepository: Send + Sync {
    /// List the available quiz sets.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the catalog cannot be fetched.
    async fn list_simulados(&self) -> Result<Vec<SimuladoSummary>, StorageError>;

    /// Fetch and validate a quiz set by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_simulado(&self, id: &SimuladoId) -> Result<Simulado, StorageError>;
}

/// Saved-progress store, one record per quiz set.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Fetch the saved record, `None` when nothing (or an empty record) is
    /// stored.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be reached.
    async fn load_progress(&self, id: &SimuladoId)
    -> Result<Option<ProgressRecord>, StorageError>;

    /// Persist (replacing) the record for a quiz set.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails.
    async fn save_progress(
        &self,
        id: &SimuladoId,
        record: &ProgressRecord,
    ) -> Result<(), StorageError>;

    /// Drop the saved record for a quiz set.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the clear fails.
    async fn clear_progress(&self, id: &SimuladoId) -> Result<(), StorageError>;

    /// All saved runs joined with catalog data, for the resume list.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be reached.
    async fn all_progress(&self) -> Result<Vec<StoredProgress>, StorageError>;
}

/// Bookmark store, keyed by (quiz set, question hash).
#[async_trait]
pub trait BookmarkRepository: Send + Sync {
    /// Create or re-categorize a bookmark.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails.
    async fn save_bookmark(&self, record: &BookmarkRecord) -> Result<(), StorageError>;

    /// Remove a bookmark.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the delete fails.
    async fn delete_bookmark(
        &self,
        id: &SimuladoId,
        hash: QuestionHash,
    ) -> Result<(), StorageError>;

    /// Every bookmark of the current user, across quiz sets.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be reached.
    async fn all_bookmarks(&self) -> Result<Vec<BookmarkRecord>, StorageError>;
}

/// Cross-session miss counters plus the completion stats sink.
#[async_trait]
pub trait IncorrectLogRepository: Send + Sync {
    /// Load the accumulated miss log.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be reached.
    async fn load_log(&self) -> Result<IncorrectLog, StorageError>;

    /// Persist the current miss log.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails.
    async fn save_log(&self, log: &IncorrectLog) -> Result<(), StorageError>;

    /// Push the log to the stats endpoint at quiz completion.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails.
    async fn flush_stats(&self, log: &IncorrectLog) -> Result<(), StorageError>;
}

//
// ─── IN-MEMORY REPOSITORY ─────────────────────────────────────────────────────
//

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    simulados: Arc<Mutex<HashMap<SimuladoId, Simulado>>>,
    progress: Arc<Mutex<HashMap<SimuladoId, ProgressRecord>>>,
    bookmarks: Arc<Mutex<Vec<BookmarkRecord>>>,
    incorrect: Arc<Mutex<IncorrectLogRecord>>,
    flushed_stats: Arc<Mutex<Vec<IncorrectLogRecord>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a quiz set (tests stand in for the backend catalog).
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn upsert_simulado(&self, simulado: &Simulado) -> Result<(), StorageError> {
        let mut guard = lock(&self.simulados)?;
        guard.insert(simulado.id().clone(), simulado.clone());
        Ok(())
    }

    /// Stats snapshots received via `flush_stats`, for test assertions.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn stats_flushes(&self) -> Result<Vec<IncorrectLogRecord>, StorageError> {
        Ok(lock(&self.flushed_stats)?.clone())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<std::sync::MutexGuard<'_, T>, StorageError> {
    mutex
        .lock()
        .map_err(|e| StorageError::Connection(e.to_string()))
}

#[async_trait]
impl SimuladoRepository for InMemoryRepository {
    async fn list_simulados(&self) -> Result<Vec<SimuladoSummary>, StorageError> {
        let guard = lock(&self.simulados)?;
        let mut summaries: Vec<_> = guard
            .values()
            .map(|simulado| SimuladoSummary {
                id: simulado.id().clone(),
                titulo: simulado.title().to_string(),
                descricao: String::new(),
                questoes_count: simulado.question_count(),
            })
            .collect();
        summaries.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(summaries)
    }

    async fn get_simulado(&self, id: &SimuladoId) -> Result<Simulado, StorageError> {
        let guard = lock(&self.simulados)?;
        guard.get(id).cloned().ok_or(StorageError::NotFound)
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn load_progress(
        &self,
        id: &SimuladoId,
    ) -> Result<Option<ProgressRecord>, StorageError> {
        let guard = lock(&self.progress)?;
        Ok(guard.get(id).cloned())
    }

    async fn save_progress(
        &self,
        id: &SimuladoId,
        record: &ProgressRecord,
    ) -> Result<(), StorageError> {
        let mut guard = lock(&self.progress)?;
        guard.insert(id.clone(), record.clone());
        Ok(())
    }

    async fn clear_progress(&self, id: &SimuladoId) -> Result<(), StorageError> {
        let mut guard = lock(&self.progress)?;
        guard.remove(id);
        Ok(())
    }

    async fn all_progress(&self) -> Result<Vec<StoredProgress>, StorageError> {
        let simulados = lock(&self.simulados)?;
        let progress = lock(&self.progress)?;
        let mut stored: Vec<_> = progress
            .iter()
            .filter_map(|(id, record)| {
                let simulado = simulados.get(id)?;
                Some(StoredProgress {
                    simulado_id: id.clone(),
                    titulo: simulado.title().to_string(),
                    descricao: String::new(),
                    questoes_count: simulado.question_count(),
                    progress: record.clone(),
                })
            })
            .collect();
        stored.sort_by(|a, b| a.simulado_id.cmp(&b.simulado_id));
        Ok(stored)
    }
}

#[async_trait]
impl BookmarkRepository for InMemoryRepository {
    async fn save_bookmark(&self, record: &BookmarkRecord) -> Result<(), StorageError> {
        let mut guard = lock(&self.bookmarks)?;
        match guard.iter_mut().find(|b| {
            b.simulado_id == record.simulado_id && b.question_hash == record.question_hash
        }) {
            Some(existing) => *existing = record.clone(),
            None => guard.push(record.clone()),
        }
        Ok(())
    }

    async fn delete_bookmark(
        &self,
        id: &SimuladoId,
        hash: QuestionHash,
    ) -> Result<(), StorageError> {
        let key = hash.value().to_string();
        let mut guard = lock(&self.bookmarks)?;
        guard.retain(|b| !(b.simulado_id == *id && b.question_hash == key));
        Ok(())
    }

    async fn all_bookmarks(&self) -> Result<Vec<BookmarkRecord>, StorageError> {
        Ok(lock(&self.bookmarks)?.clone())
    }
}

#[async_trait]
impl IncorrectLogRepository for InMemoryRepository {
    async fn load_log(&self) -> Result<IncorrectLog, StorageError> {
        Ok(lock(&self.incorrect)?.clone().into_log())
    }

    async fn save_log(&self, log: &IncorrectLog) -> Result<(), StorageError> {
        *lock(&self.incorrect)? = IncorrectLogRecord::from_log(log);
        Ok(())
    }

    async fn flush_stats(&self, log: &IncorrectLog) -> Result<(), StorageError> {
        lock(&self.flushed_stats)?.push(IncorrectLogRecord::from_log(log));
        Ok(())
    }
}

//
// ─── STORAGE AGGREGATE ────────────────────────────────────────────────────────
//

/// Aggregates the repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub simulados: Arc<dyn SimuladoRepository>,
    pub progress: Arc<dyn ProgressRepository>,
    pub bookmarks: Arc<dyn BookmarkRepository>,
    pub incorrect: Arc<dyn IncorrectLogRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        Self {
            simulados: Arc::new(repo.clone()),
            progress: Arc::new(repo.clone()),
            bookmarks: Arc::new(repo.clone()),
            incorrect: Arc::new(repo),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use simulado_core::QuizEngine;
    use simulado_core::model::BookmarkCategory;
    use simulado_core::time::fixed_now;

    fn question(statement: &str, correct: &str) -> Question {
        Question::new(
            statement,
            vec!["A".into(), "B".into(), "C".into()],
            correct,
            "",
            0,
        )
        .unwrap()
    }

    fn simulado() -> Simulado {
        Simulado::new(
            SimuladoId::new("rust-basics"),
            "Rust Basics",
            vec![
                question("Q1", "B"),
                question("Q2", "A"),
                question("Q3", "C"),
            ],
        )
    }

    #[test]
    fn progress_round_trips_through_the_record() {
        let set = simulado();
        let mut engine = QuizEngine::new(set.clone(), fixed_now()).unwrap();
        engine.select_option("B");
        engine.confirm_answer().unwrap();
        engine.advance(fixed_now()).unwrap();
        engine.select_option("C");
        engine.confirm_answer().unwrap();
        engine.advance(fixed_now()).unwrap();

        let record = ProgressRecord::from_session(engine.state());
        assert_eq!(record.current_question_index, 2);
        assert_eq!(record.score, 1);
        assert!(!record.is_review_mode);
        assert_eq!(record.incorrect_questions, vec![QuestionHash::of("Q2")]);
        assert!(record.review_questions.is_empty());

        let state = record.into_session(&set);
        assert_eq!(state.current_index(), 2);
        assert_eq!(state.score(), 1);
        assert_eq!(state.incorrect().len(), 1);
        assert_eq!(state.incorrect()[0].hash(), QuestionHash::of("Q2"));
        assert_eq!(state.questions().len(), 3);
    }

    #[test]
    fn review_pass_serializes_its_working_set() {
        let set = simulado();
        let state = SessionState::from_persisted(
            vec![set.questions()[1].clone(), set.questions()[2].clone()],
            1,
            1,
            vec![set.questions()[1].clone(), set.questions()[2].clone()],
            true,
            BookmarkManager::new(),
        );

        let record = ProgressRecord::from_session(&state);
        assert!(record.is_review_mode);
        assert_eq!(
            record.review_questions,
            vec![QuestionHash::of("Q2"), QuestionHash::of("Q3")]
        );

        let restored = record.into_session(&set);
        assert!(restored.is_review_mode());
        assert_eq!(restored.questions().len(), 2);
        assert_eq!(restored.current_index(), 1);
    }

    #[test]
    fn unresolvable_hashes_are_dropped_on_resume() {
        let set = simulado();
        let record = ProgressRecord {
            current_question_index: 0,
            score: 0,
            is_review_mode: true,
            incorrect_questions: vec![QuestionHash::of("Q2"), QuestionHash::of("deleted")],
            review_questions: vec![QuestionHash::of("Q2"), QuestionHash::of("deleted")],
        };

        let state = record.into_session(&set);
        assert_eq!(state.questions().len(), 1);
        assert_eq!(state.incorrect().len(), 1);
    }

    #[test]
    fn record_serializes_with_camel_case_keys() {
        let record = ProgressRecord {
            current_question_index: 4,
            score: 3,
            is_review_mode: false,
            incorrect_questions: vec![QuestionHash::of("Q2")],
            review_questions: Vec::new(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["currentQuestionIndex"], 4);
        assert_eq!(json["score"], 3);
        assert_eq!(json["isReviewMode"], false);
        assert_eq!(json["incorrectQuestions"][0], QuestionHash::of("Q2").value());
    }

    #[test]
    fn partial_record_fills_defaults() {
        let record: ProgressRecord =
            serde_json::from_str(r#"{"currentQuestionIndex": 2}"#).unwrap();
        assert_eq!(record.current_question_index, 2);
        assert_eq!(record.score, 0);
        assert!(!record.is_review_mode);
        assert!(record.incorrect_questions.is_empty());
    }

    #[test]
    fn bookmark_record_round_trips() {
        let id = SimuladoId::new("rust-basics");
        let bookmark = Bookmark {
            question_hash: QuestionHash::of("Q1"),
            category: BookmarkCategory::Difficult,
            statement: "Q1".into(),
        };

        let record = BookmarkRecord::from_bookmark(&id, &bookmark);
        assert_eq!(record.category, "difficult");
        assert_eq!(record.question_hash, QuestionHash::of("Q1").value().to_string());

        let (back_id, back) = record.into_bookmark().unwrap();
        assert_eq!(back_id, id);
        assert_eq!(back, bookmark);
    }

    #[test]
    fn bookmark_record_rejects_bad_data() {
        let bad_hash = BookmarkRecord {
            simulado_id: SimuladoId::new("s"),
            question_hash: "not-a-number".into(),
            enunciado: "Q".into(),
            category: "favorite".into(),
        };
        assert!(matches!(
            bad_hash.into_bookmark(),
            Err(StorageError::Serialization(_))
        ));

        let bad_category = BookmarkRecord {
            simulado_id: SimuladoId::new("s"),
            question_hash: "12".into(),
            enunciado: "Q".into(),
            category: "stars".into(),
        };
        assert!(matches!(
            bad_category.into_bookmark(),
            Err(StorageError::Serialization(_))
        ));
    }

    #[test]
    fn incorrect_log_record_round_trips_and_drops_bad_keys() {
        let id = SimuladoId::new("rust-basics");
        let mut log = IncorrectLog::new();
        log.record(&question("Q1", "B"), &id);
        log.record(&question("Q1", "B"), &id);

        let mut record = IncorrectLogRecord::from_log(&log);
        record.0.insert(
            "garbage".into(),
            IncorrectEntryRecord {
                count: 1,
                enunciado: "?".into(),
                simulado_id: id.clone(),
            },
        );

        let back = record.into_log();
        assert_eq!(back.len(), 1);
        assert_eq!(back.get(QuestionHash::of("Q1")).unwrap().count, 2);
    }

    #[test]
    fn simulado_record_validates_into_domain() {
        let record = SimuladoRecord {
            id: SimuladoId::new("rust-basics"),
            titulo: "Rust Basics".into(),
            questoes: vec![QuestaoRecord {
                enunciado: "Q1".into(),
                alternativas: vec!["A".into(), "B".into()],
                alternativa_correta: "B".into(),
                explicacao: "why".into(),
            }],
        };
        let simulado = record.into_simulado().unwrap();
        assert_eq!(simulado.question_count(), 1);
        assert_eq!(simulado.questions()[0].original_index(), 0);

        let invalid = SimuladoRecord {
            id: SimuladoId::new("broken"),
            titulo: "Broken".into(),
            questoes: vec![QuestaoRecord {
                enunciado: "Q1".into(),
                alternativas: vec!["A".into()],
                alternativa_correta: "B".into(),
                explicacao: String::new(),
            }],
        };
        assert!(invalid.into_simulado().is_err());
    }

    #[tokio::test]
    async fn in_memory_progress_save_load_clear() {
        let repo = InMemoryRepository::new();
        let id = SimuladoId::new("rust-basics");
        let record = ProgressRecord {
            current_question_index: 1,
            ..ProgressRecord::default()
        };

        assert!(repo.load_progress(&id).await.unwrap().is_none());
        repo.save_progress(&id, &record).await.unwrap();
        assert_eq!(repo.load_progress(&id).await.unwrap(), Some(record));
        repo.clear_progress(&id).await.unwrap();
        assert!(repo.load_progress(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn in_memory_bookmarks_replace_on_same_key() {
        let repo = InMemoryRepository::new();
        let id = SimuladoId::new("rust-basics");
        let bookmark = Bookmark {
            question_hash: QuestionHash::of("Q1"),
            category: BookmarkCategory::Favorite,
            statement: "Q1".into(),
        };

        repo.save_bookmark(&BookmarkRecord::from_bookmark(&id, &bookmark))
            .await
            .unwrap();
        let moved = Bookmark {
            category: BookmarkCategory::Difficult,
            ..bookmark
        };
        repo.save_bookmark(&BookmarkRecord::from_bookmark(&id, &moved))
            .await
            .unwrap();

        let all = repo.all_bookmarks().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].category, "difficult");

        repo.delete_bookmark(&id, QuestionHash::of("Q1")).await.unwrap();
        assert!(repo.all_bookmarks().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn in_memory_all_progress_joins_the_catalog() {
        let repo = InMemoryRepository::new();
        repo.upsert_simulado(&simulado()).unwrap();

        let known = SimuladoId::new("rust-basics");
        let orphan = SimuladoId::new("deleted-quiz");
        repo.save_progress(&known, &ProgressRecord::default()).await.unwrap();
        repo.save_progress(&orphan, &ProgressRecord::default()).await.unwrap();

        let stored = repo.all_progress().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].simulado_id, known);
        assert_eq!(stored[0].questoes_count, 3);
    }
}
