use thiserror::Error;

/// Application-wide error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required input is missing or has the wrong shape.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The referenced entity is absent, or hidden from the caller.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The store matched a different number of documents than it modified.
    #[error("Update mismatch: matched {matched}, modified {modified}")]
    UpdateMismatch { matched: u64, modified: u64 },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
