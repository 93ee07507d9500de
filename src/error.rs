//! Error types
//!
//! Key loading errors never escape startup: they are logged and the key is
//! treated as absent. Bind errors abort the process.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to read the encryption key from the local JSON config file
#[derive(Debug, Error)]
pub enum KeyConfigError {
    #[error("failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON in '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("'{}' does not contain a JSON object", path.display())]
    NotAnObject { path: PathBuf },

    #[error("field '{field}' in '{}' is not a string", path.display())]
    InvalidField { path: PathBuf, field: String },
}

/// Failure to bind the listening socket
#[derive(Debug, Error)]
pub enum BindError {
    #[error("failed to bind {addr}: {source}")]
    Io {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid listen address '{0}'")]
    InvalidAddress(String),

    #[error("could not find a free port between {start} and {end}")]
    NoFreePort { start: u16, end: u16 },
}
