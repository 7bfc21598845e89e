// src/error.rs
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    /// The endpoint answered with a non-success status.
    Transport { status: u16 },
    /// The request never produced a response.
    Connection(String),
    Decode(String),
    /// Not a failure: the endpoint has no more roster pages.
    EmptyPage,
}

impl fmt::Display for DirectoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport { status } => write!(f, "HTTP {}", status),
            Self::Connection(msg) => write!(f, "Connection failed: {}", msg),
            Self::Decode(msg) => write!(f, "Decode failed: {}", msg),
            Self::EmptyPage => write!(f, "Empty page"),
        }
    }
}

impl std::error::Error for DirectoryError {}

impl From<reqwest::Error> for DirectoryError {
    fn from(e: reqwest::Error) -> Self {
        Self::Connection(e.to_string())
    }
}

impl From<serde_json::Error> for DirectoryError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}
