//! Error types
//!
//! Startup errors (duplicate mounts, unknown references, bad configuration) are
//! fatal. `NotFound` is the only per-request error and is always turned into a
//! 404 response before it reaches the pipeline.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("not found: {path}")]
    NotFound { path: String },

    #[error("URL `{url}` already registered")]
    DuplicateMount { url: String },

    #[error("unknown {kind} reference `{reference}`")]
    UnknownReference {
        kind: &'static str,
        reference: String,
    },

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
