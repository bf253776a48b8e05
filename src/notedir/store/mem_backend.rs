use super::NoteStorage;
use crate::error::{NotesError, Result};
use crate::model::{DirectoryLocation, StoreEntry};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

#[derive(Clone)]
struct ContentEntry {
    text: String,
    mtime: DateTime<Utc>,
}

#[derive(Default)]
struct MemState {
    content: HashMap<String, ContentEntry>,
    writes: Vec<(String, String)>,
    directory_created: bool,
    simulate_write_error: bool,
    write_delay: Option<Duration>,
}

/// In-memory storage backend for testing.
///
/// Records every successful write so tests can assert how many writes a burst
/// of edits produced.
#[derive(Default)]
pub struct MemBackend {
    state: Mutex<MemState>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MemState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.state().simulate_write_error = simulate;
    }

    /// Make every write take `delay` (on the tokio clock) before it lands.
    pub fn set_write_delay(&self, delay: Option<Duration>) {
        self.state().write_delay = delay;
    }

    /// Backdates (or postdates) an existing file. Returns false if it is absent.
    pub fn set_mtime(&self, name: &str, mtime: DateTime<Utc>) -> bool {
        match self.state().content.get_mut(name) {
            Some(entry) => {
                entry.mtime = mtime;
                true
            }
            None => false,
        }
    }

    /// Seed a file without counting it as a write.
    pub fn insert(&self, name: &str, text: &str, mtime: DateTime<Utc>) {
        self.state().content.insert(
            name.to_string(),
            ContentEntry {
                text: text.to_string(),
                mtime,
            },
        );
    }

    pub fn contents(&self, name: &str) -> Option<String> {
        self.state().content.get(name).map(|e| e.text.clone())
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.state().content.keys().cloned().collect();
        names.sort();
        names
    }

    /// Every successful write, in order, as `(name, text)`.
    pub fn writes(&self) -> Vec<(String, String)> {
        self.state().writes.clone()
    }

    pub fn directory_created(&self) -> bool {
        self.state().directory_created
    }
}

#[async_trait]
impl NoteStorage for MemBackend {
    async fn ensure_directory(&self) -> Result<()> {
        self.state().directory_created = true;
        Ok(())
    }

    async fn list_entries(&self) -> Result<Vec<StoreEntry>> {
        Ok(self
            .state()
            .content
            .iter()
            .map(|(name, entry)| StoreEntry {
                name: name.clone(),
                modified: Some(entry.mtime),
            })
            .collect())
    }

    async fn read_text(&self, name: &str) -> Result<String> {
        self.state()
            .content
            .get(name)
            .map(|e| e.text.clone())
            .ok_or_else(|| NotesError::NotFound(name.to_string()))
    }

    async fn write_text(&self, name: &str, text: &str) -> Result<()> {
        let delay = self.state().write_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state();
        if state.simulate_write_error {
            return Err(NotesError::Store("Simulated write error".to_string()));
        }
        state.content.insert(
            name.to_string(),
            ContentEntry {
                text: text.to_string(),
                mtime: Utc::now(),
            },
        );
        state.writes.push((name.to_string(), text.to_string()));
        Ok(())
    }

    async fn delete_entry(&self, name: &str) -> Result<()> {
        self.state()
            .content
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| NotesError::NotFound(name.to_string()))
    }

    async fn resolve_directory_location(&self) -> Result<DirectoryLocation> {
        Ok(DirectoryLocation::Virtual("memory://notes".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_read_delete() {
        let backend = MemBackend::new();
        backend.write_text("a.txt", "hello").await.unwrap();
        assert_eq!(backend.read_text("a.txt").await.unwrap(), "hello");

        backend.write_text("a.txt", "replaced").await.unwrap();
        assert_eq!(backend.read_text("a.txt").await.unwrap(), "replaced");
        assert_eq!(backend.writes().len(), 2);

        backend.delete_entry("a.txt").await.unwrap();
        assert!(backend.read_text("a.txt").await.unwrap_err().is_not_found());
        assert!(backend.delete_entry("a.txt").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn simulated_write_error_leaves_content_untouched() {
        let backend = MemBackend::new();
        backend.insert("a.txt", "original", Utc::now());
        backend.set_simulate_write_error(true);

        assert!(backend.write_text("a.txt", "new").await.is_err());
        assert_eq!(backend.contents("a.txt").as_deref(), Some("original"));
        assert!(backend.writes().is_empty());
    }

    #[tokio::test]
    async fn set_mtime_shows_up_in_listing() {
        let backend = MemBackend::new();
        backend.write_text("a.txt", "alpha").await.unwrap();
        let earlier = Utc::now() - chrono::Duration::days(3);

        assert!(backend.set_mtime("a.txt", earlier));
        assert!(!backend.set_mtime("missing.txt", earlier));

        let entries = backend.list_entries().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].modified, Some(earlier));
    }
}
