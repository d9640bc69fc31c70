//! Debounce and id-adoption state machine around a [`PublicationStore`].

use crate::store::{DraftPayload, PublicationStore, SaveReceipt, StoreError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AutosaveError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("autosave coordinator is shut down")]
    Closed,
}

/// Non-blocking save indicator surfaced to the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    Idle,
    Saving,
    Saved,
    Failed,
}

#[derive(Debug, Clone)]
pub struct AutosaveConfig {
    /// Quiet window for debounced saves.
    pub debounce: Duration,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(500),
        }
    }
}

/// Remote-document lifecycle: no server id yet, or id known.
#[derive(Debug, Clone, PartialEq)]
enum Mode {
    Uncreated,
    Created(String),
}

struct Inner<S> {
    store: S,
    debounce: Duration,

    /// Latest snapshot, replaced synchronously on every edit. The timer
    /// only reads it at fire time, so a coalesced save always carries the
    /// freshest payload.
    latest: Mutex<Option<DraftPayload>>,

    mode: Mutex<Mode>,
    last_receipt: Mutex<Option<SaveReceipt>>,

    /// Serializes persist calls so saves complete in issue order.
    save_gate: tokio::sync::Mutex<()>,

    status_tx: watch::Sender<SaveStatus>,
    id_tx: watch::Sender<Option<String>>,
    closed: AtomicBool,
}

/// Coordinates when the edited publication is persisted.
///
/// Single logical owner per editing session; cheap to share via the
/// internal `Arc`.
pub struct AutosaveCoordinator<S> {
    inner: Arc<Inner<S>>,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl<S: PublicationStore> AutosaveCoordinator<S> {
    pub fn new(store: S, config: AutosaveConfig) -> Self {
        let (status_tx, _) = watch::channel(SaveStatus::Idle);
        let (id_tx, _) = watch::channel(None);

        Self {
            inner: Arc::new(Inner {
                store,
                debounce: config.debounce,
                latest: Mutex::new(None),
                mode: Mutex::new(Mode::Uncreated),
                last_receipt: Mutex::new(None),
                save_gate: tokio::sync::Mutex::new(()),
                status_tx,
                id_tx,
                closed: AtomicBool::new(false),
            }),
            timer: Mutex::new(None),
        }
    }

    /// Save status channel for the UI's autosave indicator.
    pub fn status(&self) -> watch::Receiver<SaveStatus> {
        self.inner.status_tx.subscribe()
    }

    /// Server id channel; publishes once the remote document exists.
    pub fn server_id(&self) -> watch::Receiver<Option<String>> {
        self.inner.id_tx.subscribe()
    }

    /// Record the snapshot and (re)arm the debounce timer. Any number of
    /// calls inside the quiet window collapse into one persist call
    /// carrying the last snapshot. No-op after shutdown.
    pub fn queue_save(&self, draft: DraftPayload) {
        if self.inner.closed.load(Ordering::SeqCst) {
            return;
        }

        *lock(&self.inner.latest) = Some(draft);
        debug!(debounce_ms = self.inner.debounce.as_millis() as u64, "autosave armed");

        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(inner.debounce).await;
            if inner.closed.load(Ordering::SeqCst) {
                return;
            }
            let _ = flush(&inner).await;
        });

        if let Some(previous) = lock(&self.timer).replace(handle) {
            previous.abort();
        }
    }

    /// Persist immediately, bypassing the debounce window. Used for
    /// operations that must be durable before the next action proceeds.
    pub async fn save_now(&self, draft: DraftPayload) -> Result<SaveReceipt, AutosaveError> {
        if self.inner.closed.load(Ordering::SeqCst) {
            return Err(AutosaveError::Closed);
        }

        *lock(&self.inner.latest) = Some(draft);
        if let Some(timer) = lock(&self.timer).take() {
            timer.abort();
        }

        match flush(&self.inner).await? {
            Some(receipt) => Ok(receipt),
            // A racing flush consumed the snapshot first; its receipt
            // covers this state.
            None => lock(&self.inner.last_receipt)
                .clone()
                .ok_or(AutosaveError::Closed),
        }
    }

    /// Session teardown: no save fires after this. An in-flight persist
    /// call is not aborted but its outcome is ignored.
    pub fn shutdown(&self) {
        self.inner.closed.store(true, Ordering::SeqCst);
        if let Some(timer) = lock(&self.timer).take() {
            timer.abort();
        }
    }
}

impl<S> Drop for AutosaveCoordinator<S> {
    fn drop(&mut self) {
        self.inner.closed.store(true, Ordering::SeqCst);
        if let Some(timer) = lock(&self.timer).take() {
            timer.abort();
        }
    }
}

/// Send the latest snapshot, if any remains, to the store.
async fn flush<S: PublicationStore>(
    inner: &Inner<S>,
) -> Result<Option<SaveReceipt>, AutosaveError> {
    let _gate = inner.save_gate.lock().await;

    let draft = match lock(&inner.latest).take() {
        Some(draft) => draft,
        None => return Ok(None),
    };

    let id = match &*lock(&inner.mode) {
        Mode::Uncreated => None,
        Mode::Created(id) => Some(id.clone()),
    };

    inner.status_tx.send_replace(SaveStatus::Saving);
    debug!(created = id.is_some(), "autosave flushing");

    match inner.store.create_or_update(draft.clone(), id).await {
        Ok(receipt) => {
            if inner.closed.load(Ordering::SeqCst) {
                // Session already torn down; drop the result.
                return Ok(Some(receipt));
            }

            let mut mode = lock(&inner.mode);
            if *mode == Mode::Uncreated {
                debug!(id = %receipt.id, "remote document created, adopting id");
                *mode = Mode::Created(receipt.id.clone());
                inner.id_tx.send_replace(Some(receipt.id.clone()));
            }
            drop(mode);

            *lock(&inner.last_receipt) = Some(receipt.clone());
            inner.status_tx.send_replace(SaveStatus::Saved);
            Ok(Some(receipt))
        }
        Err(error) => {
            warn!(%error, "autosave failed; keeping snapshot dirty");
            // Leave the snapshot in place for the next save to reconcile,
            // unless an edit already produced a newer one.
            let mut latest = lock(&inner.latest);
            if latest.is_none() {
                *latest = Some(draft);
            }
            drop(latest);

            inner.status_tx.send_replace(SaveStatus::Failed);
            Err(error.into())
        }
    }
}

/// Lock a mutex that is only ever held for short, non-awaiting sections.
fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use tribune_model::{Message, MetaData};

    #[derive(Default)]
    struct RecordingStore {
        calls: Mutex<Vec<Option<String>>>,
        saves: AtomicUsize,
        fail_next: AtomicBool,
    }

    impl PublicationStore for Arc<RecordingStore> {
        async fn create_or_update(
            &self,
            _draft: DraftPayload,
            id: Option<String>,
        ) -> Result<SaveReceipt, StoreError> {
            if self.fail_next.swap(false, Ordering::SeqCst) {
                return Err(StoreError::Remote("503".to_string()));
            }

            self.calls.lock().unwrap().push(id.clone());
            let n = self.saves.fetch_add(1, Ordering::SeqCst);
            Ok(SaveReceipt {
                id: id.unwrap_or_else(|| "pub-42".to_string()),
                synchronized: true,
                preview_link: None,
                subject: Some(format!("save-{}", n)),
            })
        }
    }

    fn draft(subject: &str) -> DraftPayload {
        DraftPayload {
            message: Message::new(
                MetaData {
                    subject: subject.to_string(),
                    scope: "g".to_string(),
                },
                vec![],
            ),
            html: format!("<html>{}</html>", subject),
        }
    }

    fn coordinator(store: &Arc<RecordingStore>) -> AutosaveCoordinator<Arc<RecordingStore>> {
        AutosaveCoordinator::new(
            Arc::clone(store),
            AutosaveConfig {
                debounce: Duration::from_millis(100),
            },
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_coalesces_to_latest_snapshot() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        let store = Arc::new(RecordingStore::default());
        let autosave = coordinator(&store);

        autosave.queue_save(draft("v1"));
        autosave.queue_save(draft("v2"));
        autosave.queue_save(draft("v3"));

        tokio::time::sleep(Duration::from_millis(300)).await;

        assert_eq!(store.saves.load(Ordering::SeqCst), 1);
        // The one save carried the freshest snapshot: v3's receipt exists
        // and no older snapshot remains queued.
        assert!(lock(&autosave.inner.latest).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_save_adopts_server_id() {
        let store = Arc::new(RecordingStore::default());
        let autosave = coordinator(&store);
        let id_rx = autosave.server_id();

        let receipt = autosave.save_now(draft("v1")).await.unwrap();
        assert_eq!(receipt.id, "pub-42");
        assert_eq!(*id_rx.borrow(), Some("pub-42".to_string()));

        // Subsequent saves target the adopted id.
        autosave.save_now(draft("v2")).await.unwrap();
        let calls = store.calls.lock().unwrap().clone();
        assert_eq!(calls, vec![None, Some("pub-42".to_string())]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_immediate_save_bypasses_debounce() {
        let store = Arc::new(RecordingStore::default());
        let autosave = coordinator(&store);

        autosave.queue_save(draft("debounced"));
        autosave.save_now(draft("urgent")).await.unwrap();

        assert_eq!(store.saves.load(Ordering::SeqCst), 1);

        // The armed timer was cancelled; waiting past the window sends
        // nothing more.
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(store.saves.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_keeps_state_dirty_and_recovers() {
        let store = Arc::new(RecordingStore::default());
        let autosave = coordinator(&store);
        let status_rx = autosave.status();

        store.fail_next.store(true, Ordering::SeqCst);
        let result = autosave.save_now(draft("v1")).await;
        assert!(matches!(result, Err(AutosaveError::Store(_))));
        assert_eq!(*status_rx.borrow(), SaveStatus::Failed);

        // The snapshot stayed dirty; the next quiet window reconciles it.
        assert!(lock(&autosave.inner.latest).is_some());
        autosave.queue_save(draft("v1"));
        tokio::time::sleep(Duration::from_millis(300)).await;

        assert_eq!(store.saves.load(Ordering::SeqCst), 1);
        assert_eq!(*status_rx.borrow(), SaveStatus::Saved);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_pending_debounce() {
        let store = Arc::new(RecordingStore::default());
        let autosave = coordinator(&store);

        autosave.queue_save(draft("v1"));
        autosave.shutdown();

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(store.saves.load(Ordering::SeqCst), 0);

        assert_eq!(
            autosave.save_now(draft("v2")).await,
            Err(AutosaveError::Closed)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearming_extends_the_quiet_window() {
        let store = Arc::new(RecordingStore::default());
        let autosave = coordinator(&store);

        autosave.queue_save(draft("v1"));
        tokio::time::sleep(Duration::from_millis(60)).await;
        // Still inside the window: re-arm.
        autosave.queue_save(draft("v2"));
        tokio::time::sleep(Duration::from_millis(60)).await;

        // 120ms elapsed but the second window has not; nothing saved yet.
        assert_eq!(store.saves.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(store.saves.load(Ordering::SeqCst), 1);
    }
}
