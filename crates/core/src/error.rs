//! Error types for the core library

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Import error: {0}")]
    Import(String),

    #[error("Storage error: {0}")]
    Storage(String),
}
