mod saver;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use saver::{DEFAULT_DEBOUNCE, ProgressSaver};
pub use view::SavedSessionItem;
pub use workflow::{PendingResume, SessionLoopService, SessionStart};
