use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// A single note. The identifier doubles as the on-disk filename, suffix included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub identifier: String,
    pub content: String,
    pub last_modified: DateTime<Utc>,
    /// True from creation until the first content-bearing finalize.
    pub is_provisional: bool,
}

impl Note {
    /// A freshly created, empty note that has no file yet.
    pub fn provisional(identifier: String, now: DateTime<Utc>) -> Self {
        Self {
            identifier,
            content: String::new(),
            last_modified: now,
            is_provisional: true,
        }
    }

    pub fn persisted(identifier: String, content: String, last_modified: DateTime<Utc>) -> Self {
        Self {
            identifier,
            content,
            last_modified,
            is_provisional: false,
        }
    }

    /// Titles are not stored separately: a note's title is its identifier.
    pub fn title(&self) -> &str {
        &self.identifier
    }

    /// First non-blank line of the content, with at most `max_chars` characters.
    pub fn preview(&self, max_chars: usize) -> String {
        self.content
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or("")
            .chars()
            .take(max_chars)
            .collect()
    }
}

/// One file found in the notes directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreEntry {
    pub name: String,
    pub modified: Option<DateTime<Utc>>,
}

/// Opaque handle for "open storage location" actions. Never parsed by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryLocation {
    Path(PathBuf),
    Virtual(String),
}

impl std::fmt::Display for DirectoryLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DirectoryLocation::Path(path) => write!(f, "{}", path.display()),
            DirectoryLocation::Virtual(uri) => write!(f, "{}", uri),
        }
    }
}

/// Notifications pushed to the presentation layer.
#[derive(Debug, Clone)]
pub enum NoteEvent {
    /// A new snapshot of the collection is available.
    CollectionChanged(Vec<Note>),
    DirectoryResolved(DirectoryLocation),
}

/// The in-memory collection, keyed by identifier.
///
/// Iteration order is insertion order with `insert_front` placing new notes
/// first; display order is the query view's business, not this type's.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    notes: Vec<Note>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_notes(notes: Vec<Note>) -> Self {
        let mut collection = Self::new();
        for note in notes {
            collection.upsert(note);
        }
        collection
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.get(identifier).is_some()
    }

    pub fn get(&self, identifier: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.identifier == identifier)
    }

    pub fn get_mut(&mut self, identifier: &str) -> Option<&mut Note> {
        self.notes.iter_mut().find(|n| n.identifier == identifier)
    }

    /// Inserts at the front, replacing any record with the same identifier.
    pub fn insert_front(&mut self, note: Note) {
        self.remove(&note.identifier);
        self.notes.insert(0, note);
    }

    /// Replaces a record in place, or appends it when absent.
    pub fn upsert(&mut self, note: Note) {
        match self.get_mut(&note.identifier) {
            Some(existing) => *existing = note,
            None => self.notes.push(note),
        }
    }

    pub fn remove(&mut self, identifier: &str) -> Option<Note> {
        let pos = self.notes.iter().position(|n| n.identifier == identifier)?;
        Some(self.notes.remove(pos))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Note> {
        self.notes.iter()
    }

    pub fn to_vec(&self) -> Vec<Note> {
        self.notes.clone()
    }
}
