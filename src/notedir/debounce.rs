//! Debounced autosave.
//!
//! Each identifier has at most one pending write. Scheduling again for the
//! same identifier aborts the previous timer and re-arms with the new content,
//! so a burst of edits produces one write carrying the last content.
//!
//! A pending write leaves its slot before its I/O starts. Writes that have left
//! their slot are tracked by the in-flight gate: [`WriteScheduler::cancel`]
//! waits on it, so once `cancel` returns nothing scheduled earlier can still
//! land on disk.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::task::JoinHandle;
use tokio::time::Duration;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

pub type FlushFuture = Pin<Box<dyn Future<Output = ()> + Send>>;
/// Performs the actual write for `(identifier, content)`.
pub type Flusher = Arc<dyn Fn(String, String) -> FlushFuture + Send + Sync>;

struct PendingWrite {
    generation: u64,
    content: String,
    handle: JoinHandle<()>,
}

#[derive(Clone)]
pub struct WriteScheduler {
    delay: Duration,
    pending: Arc<Mutex<HashMap<String, PendingWrite>>>,
    in_flight: Arc<tokio::sync::Mutex<()>>,
    next_generation: Arc<AtomicU64>,
    flusher: Flusher,
}

impl WriteScheduler {
    pub fn new(delay: Duration, flusher: Flusher) -> Self {
        Self {
            delay,
            pending: Arc::new(Mutex::new(HashMap::new())),
            in_flight: Arc::new(tokio::sync::Mutex::new(())),
            next_generation: Arc::new(AtomicU64::new(0)),
            flusher,
        }
    }

    fn lock_pending(&self) -> MutexGuard<'_, HashMap<String, PendingWrite>> {
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Arms (or re-arms) the timer for `identifier`.
    ///
    /// # Panics
    ///
    /// Must be called from within a Tokio runtime.
    pub fn schedule(&self, identifier: &str, content: String) {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let scheduler = self.clone();
        let id = identifier.to_string();

        // The slot is filled before the task can look at it.
        let mut pending = self.lock_pending();
        let handle = tokio::spawn(async move {
            scheduler.fire(id, generation).await;
        });
        let superseded = pending.insert(
            identifier.to_string(),
            PendingWrite {
                generation,
                content,
                handle,
            },
        );
        drop(pending);

        if let Some(previous) = superseded {
            previous.handle.abort();
            tracing::debug!(identifier, "superseded pending autosave");
        }
    }

    async fn fire(self, identifier: String, generation: u64) {
        tokio::time::sleep(self.delay).await;

        let _in_flight = self.in_flight.lock().await;
        let content = {
            let mut pending = self.lock_pending();
            let is_current = pending
                .get(&identifier)
                .is_some_and(|p| p.generation == generation);
            if is_current {
                pending.remove(&identifier).map(|p| p.content)
            } else {
                None
            }
        };
        let Some(content) = content else {
            return;
        };

        tracing::debug!(identifier = %identifier, "autosave firing");
        (self.flusher)(identifier, content).await;
    }

    /// Drops the pending write for `identifier` and waits for any autosave
    /// already writing. Returns the content that will now never be written.
    pub async fn cancel(&self, identifier: &str) -> Option<String> {
        let removed = self.lock_pending().remove(identifier);
        if let Some(pending) = &removed {
            pending.handle.abort();
            tracing::debug!(identifier, "cancelled pending autosave");
        }
        let _settled = self.in_flight.lock().await;
        removed.map(|p| p.content)
    }

    /// Writes every pending edit now instead of waiting for its timer.
    /// Returns how many writes were issued.
    pub async fn flush_all(&self) -> usize {
        let drained: Vec<(String, PendingWrite)> = self.lock_pending().drain().collect();
        for (_, pending) in &drained {
            pending.handle.abort();
        }

        let _in_flight = self.in_flight.lock().await;
        let count = drained.len();
        for (identifier, pending) in drained {
            (self.flusher)(identifier, pending.content).await;
        }
        count
    }

    pub fn is_pending(&self, identifier: &str) -> bool {
        self.lock_pending().contains_key(identifier)
    }

    pub fn pending_count(&self) -> usize {
        self.lock_pending().len()
    }
}
