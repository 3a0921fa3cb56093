use thiserror::Error;

use crate::engine::EngineError;
use crate::model::{BookmarkError, QuestionError};

/// Unified error for callers that do not care which layer failed.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Bookmark(#[from] BookmarkError),
    #[error(transparent)]
    Engine(#[from] EngineError),
}
