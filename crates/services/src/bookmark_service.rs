use std::sync::Arc;

use log::warn;

use simulado_core::model::{Bookmark, BookmarkCategory, SimuladoId};
use storage::repository::BookmarkRepository;

use crate::error::BookmarkQueryError;

/// One bookmark with its quiz scope, for cross-quiz views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizBookmark {
    pub simulado_id: SimuladoId,
    pub bookmark: Bookmark,
}

/// All of the user's bookmarks, grouped into the three fixed categories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupedBookmarks {
    pub review_later: Vec<QuizBookmark>,
    pub difficult: Vec<QuizBookmark>,
    pub favorite: Vec<QuizBookmark>,
}

impl GroupedBookmarks {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.review_later.is_empty() && self.difficult.is_empty() && self.favorite.is_empty()
    }

    #[must_use]
    pub fn in_category(&self, category: BookmarkCategory) -> &[QuizBookmark] {
        match category {
            BookmarkCategory::ReviewLater => &self.review_later,
            BookmarkCategory::Difficult => &self.difficult,
            BookmarkCategory::Favorite => &self.favorite,
        }
    }
}

/// Read-side bookmark queries across quiz sets.
///
/// The write side lives in the session workflow, scoped to the running quiz;
/// this service backs the aggregated "all bookmarks" view and the entry
/// point for studying a single bookmarked question.
#[derive(Clone)]
pub struct BookmarkQueries {
    bookmarks: Arc<dyn BookmarkRepository>,
}

impl BookmarkQueries {
    #[must_use]
    pub fn new(bookmarks: Arc<dyn BookmarkRepository>) -> Self {
        Self { bookmarks }
    }

    /// Fetch every bookmark and group by category.
    ///
    /// Malformed records are dropped with a warning rather than failing the
    /// whole view.
    ///
    /// # Errors
    ///
    /// Returns `BookmarkQueryError::Storage` if the store cannot be reached.
    pub async fn all_grouped(&self) -> Result<GroupedBookmarks, BookmarkQueryError> {
        let records = self.bookmarks.all_bookmarks().await?;
        let mut grouped = GroupedBookmarks::default();
        for record in records {
            match record.into_bookmark() {
                Ok((simulado_id, bookmark)) => {
                    let item = QuizBookmark {
                        simulado_id,
                        bookmark,
                    };
                    match item.bookmark.category {
                        BookmarkCategory::ReviewLater => grouped.review_later.push(item),
                        BookmarkCategory::Difficult => grouped.difficult.push(item),
                        BookmarkCategory::Favorite => grouped.favorite.push(item),
                    }
                }
                Err(err) => warn!("dropping malformed bookmark record: {err}"),
            }
        }
        Ok(grouped)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
