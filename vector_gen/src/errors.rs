use std::path::PathBuf;

use thiserror::Error;

use crate::io::sink::SinkError;
use crate::models::vector_key::NamingError;

/// The unified error type for the `vector_gen` crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading an input file or directory failed.
    #[error("I/O error on {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A record could not be encoded or decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A segment filename does not follow the `TICKER_YYMMDD[_TF]_START_END` grammar.
    #[error(transparent)]
    Naming(#[from] NamingError),

    /// Writing output records failed.
    #[error(transparent)]
    Sink(#[from] SinkError),

    /// The settings file is unreadable or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
