use std::io;

use thiserror::Error;

/// An edit command that could not be executed.
///
/// Only the substitute verb reports errors; every other verb treats bad
/// addresses or arguments as a silent no-op.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// The command text is malformed. The message is meant for the user.
    #[error("{0}")]
    Syntax(String),
}

impl EditError {
    pub(crate) fn syntax(detail: impl std::fmt::Display) -> Self {
        EditError::Syntax(format!("Failed to parse command: {detail}"))
    }
}

/// Failures reported by the content store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The content is larger than the store accepts.
    #[error("Content too large ({size} bytes, limit {limit} bytes)")]
    TooLarge { size: usize, limit: usize },
    /// The content is not plain UTF-8 text.
    #[error("Only plaintext is allowed: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    /// The pinned index could not be read or written.
    #[error(transparent)]
    Index(#[from] serde_json::Error),
}

impl StoreError {
    /// True for errors caused by the caller's input rather than storage.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, StoreError::TooLarge { .. } | StoreError::InvalidInput(_))
    }
}
