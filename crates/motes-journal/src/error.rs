use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum JournalError {
    #[error("failed to read memory log {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write memory log {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode memory log: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("console i/o: {0}")]
    Console(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, JournalError>;
