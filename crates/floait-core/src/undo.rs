//! Undo/delete manager.
//!
//! Implements reversible bulk deletion: `request_delete_all` captures a
//! full snapshot before wiping state, then an undo affordance stays valid
//! for a fixed grace window. The countdown is an explicit task handle,
//! aborted on undo and when a newer delete request replaces it, so it can
//! never fire after an undo.

use crate::conversation::{ConversationStore, StateSnapshot};
use crate::error::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// How long a bulk deletion remains undoable.
pub const GRACE_WINDOW: Duration = Duration::from_millis(5000);

struct PendingDelete {
    snapshot: Option<StateSnapshot>,
    timer: Option<JoinHandle<()>>,
    // Incremented on every delete request and undo; a timer only clears
    // the snapshot when its generation still matches, so a stale timer
    // cannot expire a newer snapshot.
    generation: u64,
}

/// Manages the reversible delete-all operation.
///
/// Only one pending snapshot may exist: a new delete-all request before
/// the previous grace period elapses overwrites the prior snapshot and
/// restarts the countdown (the prior undo option is lost).
pub struct UndoDeleteManager {
    store: Arc<RwLock<ConversationStore>>,
    pending: Arc<Mutex<PendingDelete>>,
    grace_window: Duration,
}

impl UndoDeleteManager {
    pub fn new(store: Arc<RwLock<ConversationStore>>) -> Self {
        Self::with_grace_window(store, GRACE_WINDOW)
    }

    /// Same as [`UndoDeleteManager::new`] with a custom grace window.
    pub fn with_grace_window(store: Arc<RwLock<ConversationStore>>, grace_window: Duration) -> Self {
        Self {
            store,
            pending: Arc::new(Mutex::new(PendingDelete {
                snapshot: None,
                timer: None,
                generation: 0,
            })),
            grace_window,
        }
    }

    /// Deletes all conversations, keeping a snapshot for the grace window.
    ///
    /// Confirmation is the presentation layer's responsibility; this
    /// method assumes the user already confirmed. Persisted storage for
    /// the deleted keys is cleared before the method returns.
    pub async fn request_delete_all(&self) -> Result<()> {
        let snapshot = {
            let mut store = self.store.write().await;
            let snapshot = store.snapshot();
            store.delete_all().await?;
            snapshot
        };
        info!(
            conversations = snapshot.conversations.len(),
            "deleted all conversations, undo available"
        );

        let mut pending = self.pending.lock().await;
        if let Some(timer) = pending.timer.take() {
            timer.abort();
        }
        pending.generation += 1;
        pending.snapshot = Some(snapshot);

        let generation = pending.generation;
        let pending_ref = Arc::clone(&self.pending);
        let grace_window = self.grace_window;
        pending.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(grace_window).await;
            let mut pending = pending_ref.lock().await;
            if pending.generation == generation {
                debug!("undo grace window elapsed, deletion is permanent");
                pending.snapshot = None;
                pending.timer = None;
            }
        }));
        Ok(())
    }

    /// Restores the pre-delete state if the grace window has not elapsed.
    ///
    /// Returns `true` when state was restored, `false` when there was
    /// nothing to undo (expired or never requested).
    pub async fn undo(&self) -> Result<bool> {
        let snapshot = {
            let mut pending = self.pending.lock().await;
            let Some(snapshot) = pending.snapshot.take() else {
                return Ok(false);
            };
            if let Some(timer) = pending.timer.take() {
                timer.abort();
            }
            pending.generation += 1;
            snapshot
        };

        self.store.write().await.restore(snapshot).await?;
        info!("restored conversations from undo snapshot");
        Ok(true)
    }

    /// Whether an undo affordance should currently be shown.
    pub async fn can_undo(&self) -> bool {
        self.pending.lock().await.snapshot.is_some()
    }
}

impl Drop for UndoDeleteManager {
    fn drop(&mut self) {
        // Best effort: stop a countdown that would outlive the manager.
        if let Ok(mut pending) = self.pending.try_lock()
            && let Some(timer) = pending.timer.take()
        {
            timer.abort();
        }
    }
}
