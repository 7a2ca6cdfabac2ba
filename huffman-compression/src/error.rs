use std::collections::TryReserveError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to allocate storage: {0}")]
    Allocation(#[from] TryReserveError),

    #[error("malformed container: {0}")]
    Format(String),
}

impl Error {
    pub(crate) fn format(message: impl Into<String>) -> Self {
        Error::Format(message.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
