//! Error types for assay-rs.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The host refused to start a worker thread.
    #[error(
        "resource exhausted: could not start {requested_workers} workers for {items} items: {source}"
    )]
    ResourceExhausted {
        requested_workers: usize,
        items: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("worker {worker} panicked; batch aborted")]
    WorkerPanicked { worker: usize },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
