use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::warn;

use simulado_core::model::SimuladoId;
use storage::repository::{ProgressRecord, ProgressRepository, StorageError};

/// Default quiet period before a scheduled save is written.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_secs(2);

/// Debounced progress writer.
///
/// Rapid `schedule` calls coalesce into a single write once the quiet period
/// passes; each new call supersedes the queued record, so the write that
/// lands is always the most recent state. Write failures are logged and
/// dropped — the next natural save trigger retries, never a loop.
#[derive(Clone)]
pub struct ProgressSaver {
    repo: Arc<dyn ProgressRepository>,
    delay: Duration,
    inner: Arc<Mutex<SaverInner>>,
}

#[derive(Default)]
struct SaverInner {
    generation: u64,
    pending: Option<(SimuladoId, ProgressRecord)>,
}

impl ProgressSaver {
    #[must_use]
    pub fn new(repo: Arc<dyn ProgressRepository>) -> Self {
        Self {
            repo,
            delay: DEFAULT_DEBOUNCE,
            inner: Arc::new(Mutex::new(SaverInner::default())),
        }
    }

    /// Override the quiet period (tests use a short one).
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Queue a record for writing after the quiet period.
    ///
    /// Must run inside a tokio runtime; the write happens on a spawned task.
    pub fn schedule(&self, id: SimuladoId, record: ProgressRecord) {
        let generation = {
            let Ok(mut inner) = self.inner.lock() else {
                warn!("progress saver state poisoned; dropping scheduled save");
                return;
            };
            inner.generation += 1;
            inner.pending = Some((id, record));
            inner.generation
        };

        let saver = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(saver.delay).await;
            let due = {
                let Ok(mut inner) = saver.inner.lock() else {
                    return;
                };
                // A newer schedule or a cancel owns the pending slot now.
                if inner.generation == generation {
                    inner.pending.take()
                } else {
                    None
                }
            };
            if let Some((id, record)) = due {
                if let Err(err) = saver.repo.save_progress(&id, &record).await {
                    warn!("failed to save progress for {id}: {err}");
                }
            }
        });
    }

    /// Drop any queued write without performing it.
    pub fn cancel(&self) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.generation += 1;
            inner.pending = None;
        }
    }

    /// Write immediately, superseding any queued record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails; unlike debounced writes
    /// this is surfaced, because explicit saves give the user feedback.
    pub async fn flush_now(
        &self,
        id: &SimuladoId,
        record: &ProgressRecord,
    ) -> Result<(), StorageError> {
        self.cancel();
        self.repo.save_progress(id, record).await
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
