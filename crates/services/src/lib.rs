#![forbid(unsafe_code)]

pub mod bookmark_service;
pub mod error;
pub mod sessions;

pub use simulado_core::Clock;
pub use sessions as session;

pub use bookmark_service::{BookmarkQueries, GroupedBookmarks, QuizBookmark};
pub use error::{BookmarkQueryError, SessionError};
pub use sessions::{
    PendingResume, ProgressSaver, SavedSessionItem, SessionLoopService, SessionStart,
};
