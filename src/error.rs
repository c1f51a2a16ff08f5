//! Error types for course processing.
//!
//! Every variant is fatal: the run stops and nothing further is written.
//! Recoverable problems go through [`crate::Diagnostics`] instead.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that halt a processing run.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error reading {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("XML parsing error in {path}: {message}")]
    Xml { path: PathBuf, message: String },

    #[error("invalid metadata: {0}")]
    Metadata(String),

    #[error("invalid step {path}: {message}")]
    Step { path: PathBuf, message: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("template error: {0}")]
    Template(String),
}

impl Error {
    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Read {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Write {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn step(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::Step {
            path: path.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
