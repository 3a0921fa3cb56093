use simulado_core::model::SimuladoId;
use storage::repository::StoredProgress;

/// One resumable run on the home screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedSessionItem {
    pub simulado_id: SimuladoId,
    pub title: String,
    pub description: String,
    /// 1-based position to display ("question N of total").
    pub position: usize,
    pub total: usize,
    pub is_review_mode: bool,
}

impl SavedSessionItem {
    #[must_use]
    pub fn from_stored(stored: StoredProgress) -> Self {
        Self {
            simulado_id: stored.simulado_id,
            title: stored.titulo,
            description: stored.descricao,
            position: stored.progress.current_question_index + 1,
            total: stored.questoes_count,
            is_review_mode: stored.progress.is_review_mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::repository::ProgressRecord;

    #[test]
    fn stored_progress_maps_to_a_display_item() {
        let stored = StoredProgress {
            simulado_id: SimuladoId::new("rust-basics"),
            titulo: "Rust Basics".into(),
            descricao: "Fundamentos".into(),
            questoes_count: 10,
            progress: ProgressRecord {
                current_question_index: 3,
                score: 2,
                is_review_mode: false,
                incorrect_questions: Vec::new(),
                review_questions: Vec::new(),
            },
        };

        let item = SavedSessionItem::from_stored(stored);
        assert_eq!(item.position, 4);
        assert_eq!(item.total, 10);
        assert_eq!(item.title, "Rust Basics");
        assert!(!item.is_review_mode);
    }
}
