#![forbid(unsafe_code)]

pub mod engine;
pub mod error;
pub mod model;
pub mod time;

pub use engine::{
    AdvanceOutcome, AnswerFeedback, BookmarkUpdate, CompletionPolicy, DONT_KNOW_OPTION,
    EngineError, EnginePhase, FinalSummary, QuizEngine,
};
pub use error::Error;
pub use time::Clock;
