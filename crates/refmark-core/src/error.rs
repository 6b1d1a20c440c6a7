//! Error types for refmark-core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RefmarkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to fetch bibliography '{url}': {message}")]
    Fetch { url: String, message: String },

    #[error("Host error: {0}")]
    Host(String),

    #[error("{0}")]
    Other(String),
}

impl RefmarkError {
    /// Create an error from any message.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Create a bibliography fetch error.
    pub fn fetch(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fetch {
            url: url.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RefmarkError>;
