use super::NoteStorage;
use crate::error::{NotesError, Result};
use crate::model::{DirectoryLocation, StoreEntry};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use tokio::fs;
use uuid::Uuid;

pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolves `name` inside the notes directory, refusing anything that
    /// would escape it.
    fn entry_path(&self, name: &str) -> Result<PathBuf> {
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\', '\0']) {
            return Err(NotesError::Store(format!("Invalid note name: {:?}", name)));
        }
        Ok(self.root.join(name))
    }
}

#[async_trait]
impl NoteStorage for FsBackend {
    async fn ensure_directory(&self) -> Result<()> {
        fs::create_dir_all(&self.root).await.map_err(NotesError::Io)
    }

    async fn list_entries(&self) -> Result<Vec<StoreEntry>> {
        let mut entries = Vec::new();
        let mut dir = fs::read_dir(&self.root)
            .await
            .map_err(|e| NotesError::from_io(&self.root.display().to_string(), e))?;

        while let Some(entry) = dir.next_entry().await.map_err(NotesError::Io)? {
            let meta = match entry.metadata().await {
                Ok(meta) => meta,
                // Removed between listing and stat.
                Err(_) => continue,
            };
            if !meta.is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            let modified = meta.modified().ok().map(DateTime::<Utc>::from);
            entries.push(StoreEntry { name, modified });
        }

        Ok(entries)
    }

    async fn read_text(&self, name: &str) -> Result<String> {
        let path = self.entry_path(name)?;
        fs::read_to_string(path)
            .await
            .map_err(|e| NotesError::from_io(name, e))
    }

    async fn write_text(&self, name: &str, text: &str) -> Result<()> {
        let target_path = self.entry_path(name)?;

        // Atomic Write
        let tmp_path = self.root.join(format!(".note-{}.tmp", Uuid::new_v4()));
        if let Err(e) = fs::write(&tmp_path, text).await {
            return Err(NotesError::Io(e));
        }
        if let Err(e) = fs::rename(&tmp_path, &target_path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(NotesError::Io(e));
        }

        Ok(())
    }

    async fn delete_entry(&self, name: &str) -> Result<()> {
        let path = self.entry_path(name)?;
        fs::remove_file(path)
            .await
            .map_err(|e| NotesError::from_io(name, e))
    }

    async fn resolve_directory_location(&self) -> Result<DirectoryLocation> {
        let path = match fs::canonicalize(&self.root).await {
            Ok(path) => path,
            Err(_) => self.root.clone(),
        };
        Ok(DirectoryLocation::Path(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_names_that_escape_the_directory() {
        let backend = FsBackend::new("/notes");
        assert!(backend.entry_path("../etc/passwd").is_err());
        assert!(backend.entry_path("a/b.txt").is_err());
        assert!(backend.entry_path("..").is_err());
        assert!(backend.entry_path("").is_err());
        assert_eq!(
            backend.entry_path("Groceries 2024.01.05.txt").unwrap(),
            PathBuf::from("/notes/Groceries 2024.01.05.txt")
        );
    }
}
