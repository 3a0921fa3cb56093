use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::model::ids::QuestionHash;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BookmarkError {
    #[error("unknown bookmark category: {0}")]
    UnknownCategory(String),
}

//
// ─── CATEGORY ─────────────────────────────────────────────────────────────────
//

/// The three fixed buckets a question can be bookmarked into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookmarkCategory {
    ReviewLater,
    Difficult,
    Favorite,
}

impl BookmarkCategory {
    pub const ALL: [Self; 3] = [Self::ReviewLater, Self::Difficult, Self::Favorite];

    /// Wire/storage name of the category.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ReviewLater => "review-later",
            Self::Difficult => "difficult",
            Self::Favorite => "favorite",
        }
    }
}

impl fmt::Display for BookmarkCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookmarkCategory {
    type Err = BookmarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "review-later" => Ok(Self::ReviewLater),
            "difficult" => Ok(Self::Difficult),
            "favorite" => Ok(Self::Favorite),
            other => Err(BookmarkError::UnknownCategory(other.to_string())),
        }
    }
}

//
// ─── BOOKMARK ─────────────────────────────────────────────────────────────────
//

/// A user-assigned category tag on a question, persisted independently of
/// quiz progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bookmark {
    pub question_hash: QuestionHash,
    pub category: BookmarkCategory,
    pub statement: String,
}

/// Result of a toggle, so callers know whether to create, move, or delete
/// the persisted entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookmarkToggle {
    Added,
    Recategorized,
    Removed,
}

impl BookmarkToggle {
    /// Whether the question ends up bookmarked after the toggle.
    #[must_use]
    pub fn is_bookmarked(self) -> bool {
        !matches!(self, Self::Removed)
    }
}

//
// ─── MANAGER ──────────────────────────────────────────────────────────────────
//

/// In-memory bookmark set for one simulado.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookmarkManager {
    entries: Vec<Bookmark>,
}

impl BookmarkManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a manager from persisted entries. Duplicate hashes keep the
    /// last entry seen.
    #[must_use]
    pub fn from_entries(entries: Vec<Bookmark>) -> Self {
        let mut manager = Self::new();
        for entry in entries {
            manager.upsert(entry);
        }
        manager
    }

    fn upsert(&mut self, bookmark: Bookmark) {
        match self.position(bookmark.question_hash) {
            Some(index) => self.entries[index] = bookmark,
            None => self.entries.push(bookmark),
        }
    }

    fn position(&self, hash: QuestionHash) -> Option<usize> {
        self.entries.iter().position(|b| b.question_hash == hash)
    }

    /// Toggles a bookmark for the given question.
    ///
    /// Same category twice removes the bookmark; a different category moves
    /// it without duplicating the entry; otherwise a new entry is created.
    pub fn toggle(
        &mut self,
        hash: QuestionHash,
        category: BookmarkCategory,
        statement: &str,
    ) -> BookmarkToggle {
        match self.position(hash) {
            Some(index) if self.entries[index].category == category => {
                self.entries.remove(index);
                BookmarkToggle::Removed
            }
            Some(index) => {
                self.entries[index].category = category;
                BookmarkToggle::Recategorized
            }
            None => {
                self.entries.push(Bookmark {
                    question_hash: hash,
                    category,
                    statement: statement.to_string(),
                });
                BookmarkToggle::Added
            }
        }
    }

    #[must_use]
    pub fn get(&self, hash: QuestionHash) -> Option<&Bookmark> {
        self.entries.iter().find(|b| b.question_hash == hash)
    }

    #[must_use]
    pub fn is_bookmarked(&self, hash: QuestionHash) -> bool {
        self.get(hash).is_some()
    }

    /// Bookmarks in the given category, in insertion order.
    pub fn list_by_category(
        &self,
        category: BookmarkCategory,
    ) -> impl Iterator<Item = &Bookmark> {
        self.entries.iter().filter(move |b| b.category == category)
    }

    #[must_use]
    pub fn entries(&self) -> &[Bookmark] {
        &self.entries
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

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn hash(n: i32) -> QuestionHash {
        QuestionHash::from_raw(n)
    }

    #[test]
    fn toggle_twice_with_same_category_removes() {
        let mut manager = BookmarkManager::new();

        let first = manager.toggle(hash(1), BookmarkCategory::Favorite, "Q1");
        assert_eq!(first, BookmarkToggle::Added);
        assert!(first.is_bookmarked());

        let second = manager.toggle(hash(1), BookmarkCategory::Favorite, "Q1");
        assert_eq!(second, BookmarkToggle::Removed);
        assert!(!second.is_bookmarked());
        assert!(manager.is_empty());
    }

    #[test]
    fn toggle_with_other_category_moves_without_duplicating() {
        let mut manager = BookmarkManager::new();
        manager.toggle(hash(1), BookmarkCategory::Favorite, "Q1");

        let moved = manager.toggle(hash(1), BookmarkCategory::Difficult, "Q1");
        assert_eq!(moved, BookmarkToggle::Recategorized);
        assert_eq!(manager.len(), 1);
        assert_eq!(
            manager.get(hash(1)).unwrap().category,
            BookmarkCategory::Difficult
        );
    }

    #[test]
    fn lists_by_category_in_insertion_order() {
        let mut manager = BookmarkManager::new();
        manager.toggle(hash(1), BookmarkCategory::Favorite, "Q1");
        manager.toggle(hash(2), BookmarkCategory::Difficult, "Q2");
        manager.toggle(hash(3), BookmarkCategory::Favorite, "Q3");

        let favorites: Vec<_> = manager
            .list_by_category(BookmarkCategory::Favorite)
            .map(|b| b.statement.as_str())
            .collect();
        assert_eq!(favorites, ["Q1", "Q3"]);
    }

    #[test]
    fn from_entries_keeps_last_duplicate() {
        let manager = BookmarkManager::from_entries(vec![
            Bookmark {
                question_hash: hash(1),
                category: BookmarkCategory::Favorite,
                statement: "Q1".into(),
            },
            Bookmark {
                question_hash: hash(1),
                category: BookmarkCategory::ReviewLater,
                statement: "Q1".into(),
            },
        ]);
        assert_eq!(manager.len(), 1);
        assert_eq!(
            manager.get(hash(1)).unwrap().category,
            BookmarkCategory::ReviewLater
        );
    }

    #[test]
    fn category_names_round_trip() {
        for category in BookmarkCategory::ALL {
            assert_eq!(category.as_str().parse::<BookmarkCategory>(), Ok(category));
        }
        assert!(matches!(
            "stars".parse::<BookmarkCategory>(),
            Err(BookmarkError::UnknownCategory(_))
        ));
    }
}
