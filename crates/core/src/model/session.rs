use crate::model::bookmark::BookmarkManager;
use crate::model::ids::QuestionHash;
use crate::model::question::Question;

//
// ─── ANSWER STATE ─────────────────────────────────────────────────────────────
//

/// Tri-state of the current question's answer.
///
/// `Selected` may be replaced any number of times; `Confirmed` is sticky
/// until the session advances to the next question.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AnswerState {
    #[default]
    Unanswered,
    Selected(String),
    Confirmed(String),
}

impl AnswerState {
    /// The selected option, confirmed or not.
    #[must_use]
    pub fn selected_option(&self) -> Option<&str> {
        match self {
            AnswerState::Unanswered => None,
            AnswerState::Selected(option) | AnswerState::Confirmed(option) => Some(option),
        }
    }

    #[must_use]
    pub fn is_confirmed(&self) -> bool {
        matches!(self, AnswerState::Confirmed(_))
    }
}

//
// ─── PROGRESS VIEW ────────────────────────────────────────────────────────────
//

/// Aggregated view of session progress, for renderers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    /// Zero-based index of the question being presented.
    pub current: usize,
    /// Size of the active working set (shrinks in review passes).
    pub total: usize,
    pub remaining: usize,
    pub is_review_mode: bool,
}

//
// ─── SESSION STATE ────────────────────────────────────────────────────────────
//

/// Mutable state of one quiz run.
///
/// `questions` is the active working set: the full original order on the
/// first pass, the insertion-ordered incorrect subset during review passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    questions: Vec<Question>,
    current_index: usize,
    score: u32,
    incorrect: Vec<Question>,
    is_review_mode: bool,
    answer: AnswerState,
    bookmarks: BookmarkManager,
}

impl SessionState {
    /// Fresh state at the start of the first pass.
    #[must_use]
    pub fn fresh(questions: Vec<Question>) -> Self {
        Self {
            questions,
            current_index: 0,
            score: 0,
            incorrect: Vec::new(),
            is_review_mode: false,
            answer: AnswerState::Unanswered,
            bookmarks: BookmarkManager::new(),
        }
    }

    /// Rehydrates state from a decoded progress record.
    ///
    /// The caller has already resolved hashes to questions and dropped any
    /// that no longer exist; the current question always starts unanswered.
    #[must_use]
    pub fn from_persisted(
        questions: Vec<Question>,
        current_index: usize,
        score: u32,
        incorrect: Vec<Question>,
        is_review_mode: bool,
        bookmarks: BookmarkManager,
    ) -> Self {
        Self {
            questions,
            current_index,
            score,
            incorrect,
            is_review_mode,
            answer: AnswerState::Unanswered,
            bookmarks,
        }
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn is_review_mode(&self) -> bool {
        self.is_review_mode
    }

    #[must_use]
    pub fn answer(&self) -> &AnswerState {
        &self.answer
    }

    #[must_use]
    pub fn bookmarks(&self) -> &BookmarkManager {
        &self.bookmarks
    }

    pub(crate) fn bookmarks_mut(&mut self) -> &mut BookmarkManager {
        &mut self.bookmarks
    }

    /// Questions answered wrong or skipped and not yet cleared in review,
    /// in insertion order.
    #[must_use]
    pub fn incorrect(&self) -> &[Question] {
        &self.incorrect
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    /// True once the index has run past the end of the working set.
    #[must_use]
    pub fn pass_exhausted(&self) -> bool {
        self.current_index >= self.questions.len()
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            current: self.current_index,
            total: self.questions.len(),
            remaining: self.questions.len().saturating_sub(self.current_index),
            is_review_mode: self.is_review_mode,
        }
    }

    pub(crate) fn set_answer(&mut self, answer: AnswerState) {
        self.answer = answer;
    }

    pub(crate) fn add_score(&mut self) {
        self.score = self.score.saturating_add(1);
    }

    /// Appends to the incorrect list unless the question is already there.
    pub(crate) fn push_incorrect(&mut self, question: &Question) {
        let hash = question.hash();
        if !self.incorrect.iter().any(|q| q.hash() == hash) {
            self.incorrect.push(question.clone());
        }
    }

    /// Drops a question from the incorrect list the moment it is answered
    /// correctly in review mode.
    pub(crate) fn clear_incorrect(&mut self, hash: QuestionHash) {
        self.incorrect.retain(|q| q.hash() != hash);
    }

    /// Steps to the next question within the current pass.
    pub(crate) fn step(&mut self) {
        self.current_index += 1;
        self.answer = AnswerState::Unanswered;
    }

    /// Starts a review pass over the current incorrect snapshot.
    pub(crate) fn enter_review(&mut self) {
        self.is_review_mode = true;
        self.questions = self.incorrect.clone();
        self.current_index = 0;
        self.answer = AnswerState::Unanswered;
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
