use std::collections::BTreeMap;

use crate::model::ids::{QuestionHash, SimuladoId};
use crate::model::question::Question;

/// Accumulated miss counter for one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncorrectEntry {
    pub count: u32,
    pub statement: String,
    pub simulado_id: SimuladoId,
}

/// Cross-session tally of wrong or skipped answers, keyed by question hash.
///
/// Loaded from the incorrect-answer store when a session starts, incremented
/// on every miss, and flushed to the stats endpoint when a quiz completes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncorrectLog {
    entries: BTreeMap<QuestionHash, IncorrectEntry>,
}

impl IncorrectLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_entries(entries: BTreeMap<QuestionHash, IncorrectEntry>) -> Self {
        Self { entries }
    }

    /// Counts one miss against the question, creating the entry on first miss.
    pub fn record(&mut self, question: &Question, simulado_id: &SimuladoId) {
        let entry = self
            .entries
            .entry(question.hash())
            .or_insert_with(|| IncorrectEntry {
                count: 0,
                statement: question.statement().to_string(),
                simulado_id: simulado_id.clone(),
            });
        entry.count = entry.count.saturating_add(1);
    }

    #[must_use]
    pub fn get(&self, hash: QuestionHash) -> Option<&IncorrectEntry> {
        self.entries.get(&hash)
    }

    pub fn iter(&self) -> impl Iterator<Item = (QuestionHash, &IncorrectEntry)> {
        self.entries.iter().map(|(hash, entry)| (*hash, entry))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
