//! # Note Collection Manager
//!
//! [`NoteManager`] is the single writer of the in-memory collection. The
//! presentation layer never touches records directly: it issues commands
//! (`load`, `create`, `edit`, `finalize`, `delete`) and reads snapshots
//! (`view`, `notes`, or [`NoteEvent`]s from [`NoteManager::subscribe`]).
//!
//! ## Lifecycle of a note
//!
//! ```text
//! create()          edit()* (debounced)        finalize()
//!   │                 │                            │
//!   ▼                 ▼                            ▼
//! tmp-<ms>.txt  ──► autosave to tmp-<ms>.txt ──► "<first line> <date>.txt"
//! (memory only)     (content/last_modified)      (old tmp file removed)
//! ```
//!
//! A provisional note finalized with blank content leaves nothing behind.
//!
//! ## Consistency
//!
//! `finalize` ends with a full reload from disk so memory can never disagree
//! with the directory after a rename. `load` and `finalize` share a gate, so a
//! reload never observes a half-renamed state. `delete` patches the collection
//! in place since no rename is involved.
//!
//! ## Error policy
//!
//! | Operation        | Failure                   | Handling           |
//! |------------------|---------------------------|--------------------|
//! | autosave         | any write error           | logged, swallowed  |
//! | finalize         | write error               | returned           |
//! | finalize         | old provisional not found | ignored            |
//! | delete           | not found                 | ignored            |
//! | load             | directory create error    | ignored            |
//! | load             | unreadable single file    | logged, skipped    |

use crate::clock::{Clock, SystemClock};
use crate::debounce::{FlushFuture, Flusher, WriteScheduler, DEFAULT_DEBOUNCE};
use crate::error::Result;
use crate::model::{Collection, DirectoryLocation, Note, NoteEvent};
use crate::naming;
use crate::query;
use crate::store::{note_entries, NoteStorage};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::broadcast;

const EVENT_CAPACITY: usize = 64;

/// Tunables for a [`NoteManager`].
#[derive(Clone)]
pub struct ManagerOptions {
    /// Suffix of note files, leading dot included.
    pub file_ext: String,
    pub debounce: Duration,
    pub clock: Arc<dyn Clock>,
}

impl Default for ManagerOptions {
    fn default() -> Self {
        Self {
            file_ext: ".txt".to_string(),
            debounce: DEFAULT_DEBOUNCE,
            clock: Arc::new(SystemClock),
        }
    }
}

impl ManagerOptions {
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

/// Result of closing an editing session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finalized {
    /// Content is on disk under `identifier`.
    Saved {
        identifier: String,
        /// The provisional identifier, when the note was renamed.
        renamed_from: Option<String>,
    },
    /// A provisional note with blank content was dropped without a trace.
    Discarded,
}

impl Finalized {
    pub fn identifier(&self) -> Option<&str> {
        match self {
            Finalized::Saved { identifier, .. } => Some(identifier),
            Finalized::Discarded => None,
        }
    }
}

struct Inner<S: NoteStorage> {
    storage: S,
    collection: Mutex<Collection>,
    events: broadcast::Sender<NoteEvent>,
    clock: Arc<dyn Clock>,
    file_ext: String,
    /// Serializes `load` behind any in-flight `finalize`.
    sync_gate: tokio::sync::Mutex<()>,
}

impl<S: NoteStorage> Inner<S> {
    fn collection(&self) -> MutexGuard<'_, Collection> {
        self.collection.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn publish(&self, snapshot: Vec<Note>) {
        // No subscribers is fine.
        let _ = self.events.send(NoteEvent::CollectionChanged(snapshot));
    }

    /// Debounced write. Failures never reach the editor; the next edit or the
    /// final `finalize` is the retry.
    async fn autosave(&self, identifier: &str, content: &str) {
        if let Err(e) = self.storage.write_text(identifier, content).await {
            tracing::warn!(identifier, error = %e, "autosave failed");
            return;
        }

        let now = self.clock.now_utc();
        let snapshot = {
            let mut collection = self.collection();
            match collection.get_mut(identifier) {
                Some(note) => {
                    note.content = content.to_string();
                    note.last_modified = note.last_modified.max(now);
                }
                None => tracing::debug!(identifier, "autosaved note is not in the collection"),
            }
            collection.to_vec()
        };
        self.publish(snapshot);
    }

    async fn load_locked(&self) -> Result<Vec<Note>> {
        if let Err(e) = self.storage.ensure_directory().await {
            tracing::debug!(error = %e, "ensure_directory failed, assuming it exists");
        }

        let entries = note_entries(self.storage.list_entries().await?, &self.file_ext);
        let mut notes = Vec::with_capacity(entries.len());
        for entry in entries {
            let content = match self.storage.read_text(&entry.name).await {
                Ok(content) => content,
                Err(e) => {
                    tracing::warn!(
                        identifier = %entry.name,
                        error = %e,
                        "skipping unreadable note"
                    );
                    continue;
                }
            };
            let modified = entry.modified.unwrap_or_else(|| self.clock.now_utc());
            notes.push(Note::persisted(entry.name, content, modified));
        }

        let snapshot = {
            let mut collection = self.collection();
            *collection = Collection::from_notes(notes);
            collection.to_vec()
        };
        tracing::info!(count = snapshot.len(), "loaded notes");
        self.publish(snapshot.clone());
        Ok(snapshot)
    }

    fn is_provisional(&self, identifier: &str) -> bool {
        let flagged = self
            .collection()
            .get(identifier)
            .is_some_and(|n| n.is_provisional);
        flagged || naming::is_provisional_identifier(identifier, &self.file_ext)
    }

    /// Removes a file that may never have existed.
    async fn delete_if_present(&self, identifier: &str) -> Result<()> {
        match self.storage.delete_entry(identifier).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_not_found() => {
                tracing::debug!(identifier, "no file to delete");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

/// Owns the note collection and keeps it consistent with storage.
pub struct NoteManager<S: NoteStorage> {
    inner: Arc<Inner<S>>,
    scheduler: WriteScheduler,
}

impl<S: NoteStorage> NoteManager<S> {
    pub fn new(storage: S, options: ManagerOptions) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let inner = Arc::new(Inner {
            storage,
            collection: Mutex::new(Collection::new()),
            events,
            clock: options.clock,
            file_ext: naming::normalize_ext(&options.file_ext),
            sync_gate: tokio::sync::Mutex::new(()),
        });

        let flush_inner = Arc::clone(&inner);
        let flusher: Flusher =
            Arc::new(move |identifier: String, content: String| -> FlushFuture {
                let inner = Arc::clone(&flush_inner);
                Box::pin(async move { inner.autosave(&identifier, &content).await })
            });
        let scheduler = WriteScheduler::new(options.debounce, flusher);

        Self { inner, scheduler }
    }

    pub fn storage(&self) -> &S {
        &self.inner.storage
    }

    pub fn file_ext(&self) -> &str {
        &self.inner.file_ext
    }

    pub fn subscribe(&self) -> broadcast::Receiver<NoteEvent> {
        self.inner.events.subscribe()
    }

    /// Snapshot of the collection in iteration order.
    pub fn notes(&self) -> Vec<Note> {
        self.inner.collection().to_vec()
    }

    pub fn get(&self, identifier: &str) -> Option<Note> {
        self.inner.collection().get(identifier).cloned()
    }

    /// Rebuilds the collection from the directory, replacing what was in memory.
    pub async fn load(&self) -> Result<Vec<Note>> {
        let _gate = self.inner.sync_gate.lock().await;
        self.inner.load_locked().await
    }

    /// Starts a new, empty, provisional note and returns its identifier.
    pub fn create(&self) -> String {
        let mut now = self.inner.clock.now_utc();
        let snapshot;
        let identifier = {
            let mut collection = self.inner.collection();
            let mut identifier = naming::provisional_identifier(now, &self.inner.file_ext);
            while collection.contains(&identifier) {
                now += chrono::Duration::milliseconds(1);
                identifier = naming::provisional_identifier(now, &self.inner.file_ext);
            }
            collection.insert_front(Note::provisional(identifier.clone(), now));
            snapshot = collection.to_vec();
            identifier
        };
        tracing::info!(identifier = %identifier, "created provisional note");
        self.inner.publish(snapshot);
        identifier
    }

    /// Records an edit. The write happens after the debounce delay, and only
    /// the latest content of a burst is written.
    ///
    /// # Panics
    ///
    /// Must be called from within a Tokio runtime.
    pub fn edit(&self, identifier: &str, content: impl Into<String>) {
        self.scheduler.schedule(identifier, content.into());
    }

    /// Ends the editing session for `identifier`, committing `content`.
    ///
    /// Any pending autosave is dropped in favour of `content`. Provisional
    /// notes are renamed after their first line (or discarded when blank).
    /// Write failures are returned: the content may not be on disk.
    pub async fn finalize(&self, identifier: &str, content: &str) -> Result<Finalized> {
        let _gate = self.inner.sync_gate.lock().await;
        self.scheduler.cancel(identifier).await;

        let outcome = if self.inner.is_provisional(identifier) {
            self.finalize_provisional(identifier, content).await?
        } else {
            self.inner.storage.write_text(identifier, content).await?;
            Finalized::Saved {
                identifier: identifier.to_string(),
                renamed_from: None,
            }
        };
        tracing::info!(identifier, outcome = ?outcome, "finalized note");

        if let Err(e) = self.inner.load_locked().await {
            tracing::warn!(error = %e, "reload after finalize failed, patching in place");
            self.patch_after_finalize(identifier, content, &outcome);
        }
        Ok(outcome)
    }

    async fn finalize_provisional(&self, identifier: &str, content: &str) -> Result<Finalized> {
        if content.trim().is_empty() {
            // An autosave may have written a draft that was later erased.
            if let Err(e) = self.inner.delete_if_present(identifier).await {
                tracing::warn!(identifier, error = %e, "could not remove discarded draft");
            }
            self.inner.collection().remove(identifier);
            return Ok(Finalized::Discarded);
        }

        let today = self.inner.clock.now().date_naive();
        let target = naming::derive_final_identifier(content, today, &self.inner.file_ext)
            .unwrap_or_else(|| identifier.to_string());

        if target != identifier && self.inner.collection().contains(&target) {
            tracing::warn!(identifier = %target, "derived name already in use, overwriting");
        }
        self.inner.storage.write_text(&target, content).await?;

        if target == identifier {
            return Ok(Finalized::Saved {
                identifier: target,
                renamed_from: None,
            });
        }

        // The content is safe under its new name; a stale draft is cosmetic.
        if let Err(e) = self.inner.delete_if_present(identifier).await {
            tracing::warn!(identifier, error = %e, "could not remove provisional file");
        }
        Ok(Finalized::Saved {
            identifier: target,
            renamed_from: Some(identifier.to_string()),
        })
    }

    fn patch_after_finalize(&self, identifier: &str, content: &str, outcome: &Finalized) {
        let now = self.inner.clock.now_utc();
        let snapshot = {
            let mut collection = self.inner.collection();
            collection.remove(identifier);
            if let Some(saved) = outcome.identifier() {
                collection.upsert(Note::persisted(saved.to_string(), content.to_string(), now));
            }
            collection.to_vec()
        };
        self.inner.publish(snapshot);
    }

    /// Removes the note's file and its record. Deleting something already gone
    /// is not an error. A pending autosave for the note is dropped first so it
    /// cannot recreate the file.
    pub async fn delete(&self, identifier: &str) -> Result<()> {
        self.scheduler.cancel(identifier).await;
        self.inner.delete_if_present(identifier).await?;

        let snapshot = {
            let mut collection = self.inner.collection();
            collection.remove(identifier);
            collection.to_vec()
        };
        tracing::info!(identifier, "deleted note");
        self.inner.publish(snapshot);
        Ok(())
    }

    /// Display-ordered, filtered snapshot.
    pub fn view(&self, filter: &str) -> Vec<Note> {
        query::view(self.inner.collection().iter(), filter)
    }

    /// Resolves where the notes live and announces it to subscribers.
    pub async fn directory_location(&self) -> Result<DirectoryLocation> {
        let location = self.inner.storage.resolve_directory_location().await?;
        let _ = self
            .inner
            .events
            .send(NoteEvent::DirectoryResolved(location.clone()));
        Ok(location)
    }

    pub fn pending_writes(&self) -> usize {
        self.scheduler.pending_count()
    }

    /// Writes all pending autosaves immediately. Call before dropping the
    /// manager so no edit is lost.
    pub async fn shutdown(&self) -> usize {
        self.scheduler.flush_all().await
    }
}
