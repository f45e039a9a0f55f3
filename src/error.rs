//! Error types shared by the store, the launchers and the menu.

use std::{io, path::PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SwitchError>;

#[derive(Debug, Error)]
pub enum SwitchError {
    /// Rejected configuration name; the create flow re-prompts on this
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("failed to access '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to start '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    /// The prompt backend itself failed
    #[error("prompt failed: {0}")]
    Prompt(String),

    /// User backed out of a prompt
    #[error("cancelled")]
    Cancelled,
}

impl SwitchError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        SwitchError::Io { path: path.into(), source }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum ValidationError {
    #[error("name cannot be empty")]
    Empty,

    #[error("name '{0}' may only contain letters, digits, '-' and '_'")]
    InvalidCharacters(String),

    #[error("name 'default' is reserved")]
    Reserved,

    #[error("a configuration named '{0}' already exists")]
    AlreadyExists(String),
}
