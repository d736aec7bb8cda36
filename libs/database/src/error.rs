/// Errors raised while establishing a database connection.
///
/// Query-level failures are not represented here; repositories classify
/// those themselves.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// Driver-level error (bad URI, invalid options, ...)
    #[cfg(feature = "mongodb")]
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    /// The server could not be reached or refused the handshake
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
}

/// Result type alias for database operations
pub type DatabaseResult<T> = Result<T, DatabaseError>;
