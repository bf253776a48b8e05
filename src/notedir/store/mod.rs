//! # Storage Layer
//!
//! The engine talks to storage through the [`NoteStorage`] trait: a small
//! async capability set over one flat directory of plain-text files.
//!
//! ## Philosophy
//! - **Files are Truth**: every entry with the note suffix is exactly one note;
//!   the file body is the note content verbatim, no header, no metadata.
//! - **Whole-file replace**: writes never append and are atomic from the
//!   caller's point of view (temp file + rename on disk).
//! - **Errors are values**: "not found" comes back as
//!   [`NotesError::NotFound`](crate::error::NotesError::NotFound) so callers
//!   decide whether an absent file matters.
//!
//! ## Implementations
//!
//! - [`fs_backend::FsBackend`]: production, backed by `tokio::fs`.
//! - [`mem_backend::MemBackend`]: in-memory, for tests. Counts writes and can
//!   simulate write failures.
//!
//! ## Storage Layout
//!
//! ```text
//! notes/
//! ├── Groceries 2024.01.05.txt
//! ├── tmp-1704450000000.txt     # provisional note, autosaved before finalize
//! └── .note-{uuid}.tmp          # in-flight atomic write (ignored by listing)
//! ```

use crate::error::Result;
use crate::model::{DirectoryLocation, StoreEntry};
use async_trait::async_trait;

pub mod fs_backend;
pub mod mem_backend;

/// Raw I/O over the notes directory.
#[async_trait]
pub trait NoteStorage: Send + Sync + 'static {
    /// Create the notes directory if absent. Succeeds when it already exists.
    async fn ensure_directory(&self) -> Result<()>;

    /// Files directly inside the notes directory. No suffix filtering.
    async fn list_entries(&self) -> Result<Vec<StoreEntry>>;

    /// Full content of `name`. `NotFound` if absent.
    async fn read_text(&self, name: &str) -> Result<String>;

    /// Create or overwrite `name` with `text`.
    /// MUST be atomic: readers never observe partial content.
    async fn write_text(&self, name: &str, text: &str) -> Result<()>;

    /// Remove `name`. `NotFound` if absent.
    async fn delete_entry(&self, name: &str) -> Result<()>;

    /// Where the notes live, for display and "open in file manager" only.
    async fn resolve_directory_location(&self) -> Result<DirectoryLocation>;
}

/// Keeps only entries carrying the note suffix.
pub fn note_entries(entries: Vec<StoreEntry>, ext: &str) -> Vec<StoreEntry> {
    entries
        .into_iter()
        .filter(|e| e.name.len() > ext.len() && e.name.ends_with(ext) && !e.name.starts_with('.'))
        .collect()
}
