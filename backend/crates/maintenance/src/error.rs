//! Purge Error Types

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type PurgeResult<T> = Result<T, PurgeError>;

#[derive(Debug, Error)]
pub enum PurgeError {
    /// The operator answered something other than `yes`
    #[error("Flushing migration files cancelled.")]
    Cancelled,

    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Reading the answer or writing the listing failed
    #[error("Console error: {0}")]
    Console(#[from] io::Error),
}

impl PurgeError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        PurgeError::Io {
            path: path.into(),
            source,
        }
    }

    /// Process exit code for the CLI
    pub fn exit_code(&self) -> u8 {
        match self {
            PurgeError::Cancelled => 1,
            PurgeError::Io { .. } | PurgeError::Console(_) => 2,
        }
    }
}
