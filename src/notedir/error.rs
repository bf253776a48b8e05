use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotesError {
    #[error("Note not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl NotesError {
    /// Maps an I/O failure on `name`, keeping "not found" distinguishable from
    /// real disk failures.
    pub fn from_io(name: &str, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            NotesError::NotFound(name.to_string())
        } else {
            NotesError::Io(err)
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, NotesError::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, NotesError>;
