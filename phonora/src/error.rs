use std::fmt::Display;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error while {context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON parse error while {context}: {source}")]
    Json {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("dictionary line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("download of {name} failed: {message}")]
    Download { name: String, message: String },
    #[error("path does not exist: {}", .0.display())]
    MissingPath(PathBuf),
    #[error("unknown dictionary resource: {0}")]
    UnknownResource(String),
    #[error("invalid level: {0}")]
    UnknownLevel(String),
    #[error("requested {requested} sentences but level '{level}' only has {available}")]
    SampleTooLarge {
        level: String,
        requested: usize,
        available: usize,
    },
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

impl Error {
    pub(crate) fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }

    pub(crate) fn json(context: &'static str, source: serde_json::Error) -> Self {
        Self::Json { context, source }
    }

    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }

    pub(crate) fn download(name: &str, err: impl Display) -> Self {
        Self::Download {
            name: name.to_string(),
            message: err.to_string(),
        }
    }

    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}
