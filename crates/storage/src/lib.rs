#![forbid(unsafe_code)]

pub mod http;
pub mod repository;

pub use http::HttpStore;
pub use repository::{
    BookmarkRecord, BookmarkRepository, IncorrectEntryRecord, IncorrectLogRecord,
    IncorrectLogRepository, InMemoryRepository, ProgressRecord, ProgressRepository,
    QuestaoRecord, SimuladoRecord, SimuladoRepository, SimuladoSummary, Storage, StorageError,
    StoredProgress,
};
