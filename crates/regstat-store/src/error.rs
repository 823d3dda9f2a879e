use thiserror::Error;

/// Errors from statistics store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing database reported a failure (connection loss, write
    /// timeout, constraint violation not otherwise handled).
    #[error("database error: {0}")]
    Backend(#[from] mongodb::error::Error),

    /// The store configuration is unusable.
    #[error("store configuration error: {0}")]
    Config(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
