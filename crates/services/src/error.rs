//! Shared error types for the services crate.

use thiserror::Error;

use simulado_core::engine::EngineError;
use storage::repository::StorageError;

/// Errors emitted by the session workflow.
///
/// Only load and construction failures surface here; fire-and-forget
/// persistence failures are logged and never abort a running session.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    /// The question set could not be fetched, so nothing can be presented.
    #[error("failed to load simulado")]
    Load(#[source] StorageError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by bookmark queries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BookmarkQueryError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}
