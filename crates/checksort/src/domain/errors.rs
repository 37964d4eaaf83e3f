//! Domain-specific errors.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BufferError {
    #[error("failed to read buffer at {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write buffer at {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
