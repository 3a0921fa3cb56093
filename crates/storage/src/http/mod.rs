use std::env;
use std::sync::Arc;

use reqwest::{Client, Response, StatusCode};

use crate::repository::{
    BookmarkRepository, IncorrectLogRepository, ProgressRepository, SimuladoRepository, Storage,
    StorageError,
};

mod bookmark_repo;
mod incorrect_log_repo;
mod progress_repo;
mod simulado_repo;

/// Base URL used when `SIMULADO_API_BASE_URL` is not set.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";

/// REST adapter for the quiz backend.
///
/// Thin request plumbing only: no retries, no extra timeouts. Failures map
/// to `StorageError` and the caller decides whether they are fatal.
#[derive(Clone)]
pub struct HttpStore {
    client: Client,
    base_url: String,
}

impl HttpStore {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build a store from `SIMULADO_API_BASE_URL`, falling back to the
    /// default local backend address.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url =
            env::var("SIMULADO_API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.into());
        Self::new(base_url)
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn client(&self) -> &Client {
        &self.client
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

pub(crate) fn connection(err: reqwest::Error) -> StorageError {
    StorageError::Connection(err.to_string())
}

pub(crate) fn decode(err: reqwest::Error) -> StorageError {
    StorageError::Serialization(err.to_string())
}

pub(crate) fn check_status(response: &Response) -> Result<(), StorageError> {
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(StorageError::NotFound);
    }
    if !status.is_success() {
        return Err(StorageError::Status(status.as_u16()));
    }
    Ok(())
}

impl Storage {
    /// Build a `Storage` backed by the HTTP backend.
    #[must_use]
    pub fn http(base_url: impl Into<String>) -> Self {
        let store = HttpStore::new(base_url);
        let simulados: Arc<dyn SimuladoRepository> = Arc::new(store.clone());
        let progress: Arc<dyn ProgressRepository> = Arc::new(store.clone());
        let bookmarks: Arc<dyn BookmarkRepository> = Arc::new(store.clone());
        let incorrect: Arc<dyn IncorrectLogRepository> = Arc::new(store);
        Self {
            simulados,
            progress,
            bookmarks,
            incorrect,
        }
    }
}
