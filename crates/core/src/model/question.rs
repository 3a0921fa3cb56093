use thiserror::Error;

use crate::engine::DONT_KNOW_OPTION;
use crate::model::ids::{QuestionHash, SimuladoId};

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

/// Errors raised while validating loaded question data.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question has no alternatives")]
    NoOptions,

    #[error("correct alternative {0:?} is not among the question's alternatives")]
    CorrectOptionMissing(String),

    /// Question authoring must avoid reusing the "I don't know" sentinel as a
    /// real answer; scoring could not distinguish the two.
    #[error("correct alternative collides with the {DONT_KNOW_OPTION:?} sentinel")]
    CorrectAnswerIsSentinel,
}

//
// ─── QUESTION ─────────────────────────────────────────────────────────────────
//

/// A single multiple-choice question, immutable once loaded.
///
/// Identified across sessions by the hash of its statement; the position in
/// the original set is kept as `original_index` for display ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    statement: String,
    options: Vec<String>,
    correct_option: String,
    explanation: String,
    original_index: usize,
}

impl Question {
    /// Validates and builds a question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::NoOptions` if `options` is empty,
    /// `QuestionError::CorrectOptionMissing` if `correct_option` is not one of
    /// `options`, and `QuestionError::CorrectAnswerIsSentinel` if the correct
    /// answer text equals the "I don't know" sentinel.
    pub fn new(
        statement: impl Into<String>,
        options: Vec<String>,
        correct_option: impl Into<String>,
        explanation: impl Into<String>,
        original_index: usize,
    ) -> Result<Self, QuestionError> {
        let correct_option = correct_option.into();
        if options.is_empty() {
            return Err(QuestionError::NoOptions);
        }
        if correct_option == DONT_KNOW_OPTION {
            return Err(QuestionError::CorrectAnswerIsSentinel);
        }
        if !options.iter().any(|option| *option == correct_option) {
            return Err(QuestionError::CorrectOptionMissing(correct_option));
        }

        Ok(Self {
            statement: statement.into(),
            options,
            correct_option,
            explanation: explanation.into(),
            original_index,
        })
    }

    /// Stable identifier derived from the statement text.
    #[must_use]
    pub fn hash(&self) -> QuestionHash {
        QuestionHash::of(&self.statement)
    }

    #[must_use]
    pub fn statement(&self) -> &str {
        &self.statement
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_option(&self) -> &str {
        &self.correct_option
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    #[must_use]
    pub fn original_index(&self) -> usize {
        self.original_index
    }
}

//
// ─── SIMULADO ─────────────────────────────────────────────────────────────────
//

/// A loaded quiz set: title plus its questions in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Simulado {
    id: SimuladoId,
    title: String,
    questions: Vec<Question>,
}

impl Simulado {
    #[must_use]
    pub fn new(id: SimuladoId, title: impl Into<String>, questions: Vec<Question>) -> Self {
        Self {
            id,
            title: title.into(),
            questions,
        }
    }

    #[must_use]
    pub fn id(&self) -> &SimuladoId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// Resolves a persisted hash back to a question.
    ///
    /// Returns `None` when the question set changed and the hash no longer
    /// matches anything; callers drop such references silently.
    #[must_use]
    pub fn find_by_hash(&self, hash: QuestionHash) -> Option<&Question> {
        self.questions.iter().find(|q| q.hash() == hash)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn builds_a_valid_question() {
        let q = Question::new("Q1", opts(&["A", "B"]), "B", "because", 0).unwrap();
        assert_eq!(q.correct_option(), "B");
        assert_eq!(q.hash(), QuestionHash::of("Q1"));
        assert_eq!(q.original_index(), 0);
    }

    #[test]
    fn rejects_empty_alternatives() {
        let err = Question::new("Q1", Vec::new(), "A", "", 0).unwrap_err();
        assert_eq!(err, QuestionError::NoOptions);
    }

    #[test]
    fn rejects_correct_option_outside_alternatives() {
        let err = Question::new("Q1", opts(&["A", "B"]), "C", "", 0).unwrap_err();
        assert!(matches!(err, QuestionError::CorrectOptionMissing(_)));
    }

    #[test]
    fn rejects_sentinel_as_correct_answer() {
        let err = Question::new(
            "Q1",
            opts(&["A", DONT_KNOW_OPTION]),
            DONT_KNOW_OPTION,
            "",
            0,
        )
        .unwrap_err();
        assert_eq!(err, QuestionError::CorrectAnswerIsSentinel);
    }

    #[test]
    fn resolves_questions_by_hash() {
        let q1 = Question::new("Q1", opts(&["A", "B"]), "A", "", 0).unwrap();
        let q2 = Question::new("Q2", opts(&["A", "B"]), "B", "", 1).unwrap();
        let simulado = Simulado::new(SimuladoId::new("rust-basics"), "Rust", vec![q1, q2]);

        let found = simulado.find_by_hash(QuestionHash::of("Q2")).unwrap();
        assert_eq!(found.statement(), "Q2");
        assert!(simulado.find_by_hash(QuestionHash::of("gone")).is_none());
    }
}
