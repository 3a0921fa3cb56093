mod bookmark;
mod ids;
mod incorrect_log;
mod question;
mod session;

pub use ids::{QuestionHash, SimuladoId};

pub use bookmark::{Bookmark, BookmarkCategory, BookmarkError, BookmarkManager, BookmarkToggle};
pub use incorrect_log::{IncorrectEntry, IncorrectLog};
pub use question::{Question, QuestionError, Simulado};
pub use session::{AnswerState, SessionProgress, SessionState};
