//! Per-track download error.

use thiserror::Error;

/// Why a single track download failed. Failures are reported per item and never abort a run.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Curl reported an error (DNS, connection, TLS, aborted write, ...).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// Final response status was not 200.
    #[error("HTTP {0}")]
    Http(u32),
    /// Body ended before the advertised `Content-Length`.
    #[error("partial transfer: expected {expected} bytes, got {received}")]
    PartialTransfer { expected: u64, received: u64 },
    /// Creating, writing or renaming the local file failed.
    #[error("storage: {0}")]
    Storage(String),
}

impl FetchError {
    pub(crate) fn storage(err: impl std::fmt::Display) -> Self {
        FetchError::Storage(format!("{:#}", err))
    }
}
