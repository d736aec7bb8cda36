use database::DatabaseError;
use http::StatusCode;
use mongodb::error::{ErrorKind, WriteFailure};
use thiserror::Error;

use crate::models::RecipeId;

/// Server code MongoDB reports for a unique index violation.
pub const DUPLICATE_KEY_CODE: i32 = 11000;

/// Failure reported by a recipe store, passed through the repository as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A write would break the (name, author.pseudo) unique index
    #[error("{0}")]
    DuplicateKey(String),

    /// Anything else: connectivity, malformed document, server error
    #[error("{0}")]
    Backend(String),
}

impl StoreError {
    /// The store's own message
    pub fn message(&self) -> &str {
        match self {
            StoreError::DuplicateKey(message) | StoreError::Backend(message) => message,
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        let code = match err.kind.as_ref() {
            ErrorKind::Write(WriteFailure::WriteError(write_error)) => Some(write_error.code),
            ErrorKind::Command(command_error) => Some(command_error.code),
            _ => None,
        };

        if code == Some(DUPLICATE_KEY_CODE) {
            StoreError::DuplicateKey(err.to_string())
        } else {
            StoreError::Backend(err.to_string())
        }
    }
}

impl From<mongodb::bson::ser::Error> for StoreError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

impl From<DatabaseError> for StoreError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::Mongo(err) => err.into(),
            other => StoreError::Backend(other.to_string()),
        }
    }
}

/// Domain-level classification of a failed recipe operation.
///
/// An empty listing is not an error; operations that can legitimately find
/// nothing return `Ok(None)`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecipeError {
    #[error("Recipe with id '{0}' not found")]
    NotFound(RecipeId),

    #[error("Recipe with name '{name}' and pseudo '{pseudo}' already exists")]
    Conflict { name: String, pseudo: String },

    /// Store failure message, verbatim
    #[error("{0}")]
    Unprocessable(String),
}

pub type RecipeResult<T> = Result<T, RecipeError>;

impl RecipeError {
    /// HTTP status the transport layer should answer with
    pub fn status_code(&self) -> StatusCode {
        match self {
            RecipeError::NotFound(_) => StatusCode::NOT_FOUND,
            RecipeError::Conflict { .. } => StatusCode::CONFLICT,
            RecipeError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl From<StoreError> for RecipeError {
    fn from(err: StoreError) -> Self {
        RecipeError::Unprocessable(err.message().to_string())
    }
}
