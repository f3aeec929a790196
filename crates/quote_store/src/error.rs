use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Timeout occurred while storing data (deadline {0:?})")]
    Timeout(Duration),

    #[error("Error occurred while storing data: {0}")]
    Write(#[source] sqlx::Error),

    /// Opening the database or creating the schema failed.
    #[error("could not prepare quote database: {0}")]
    Connect(#[source] sqlx::Error),
}

impl StoreError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, StoreError::Timeout(_))
    }
}
