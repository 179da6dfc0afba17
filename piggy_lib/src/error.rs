//! Error types for the library layer.

use std::fmt;

use piggy_api::Problem;

use crate::storage::StorageError;

/// Errors produced by the library layer, wrapping API problems and adding
/// storage and input validation failures.
#[derive(Debug)]
pub enum PiggyError {
    /// A classified problem from the API client.
    Api(Problem),
    /// The persisted string store could not be read or written.
    Storage(StorageError),
    /// User-provided input failed validation.
    InvalidInput(String),
}

impl fmt::Display for PiggyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api(p) => write!(f, "API error ({}): {}", p.kind(), p),
            Self::Storage(e) => write!(f, "Storage error: {}", e),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for PiggyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Api(p) => Some(p),
            Self::Storage(e) => Some(e),
            Self::InvalidInput(_) => None,
        }
    }
}

impl From<Problem> for PiggyError {
    fn from(p: Problem) -> Self {
        Self::Api(p)
    }
}

impl From<StorageError> for PiggyError {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

impl PiggyError {
    /// The API problem behind this error, if any.
    pub fn problem(&self) -> Option<Problem> {
        match self {
            Self::Api(p) => Some(*p),
            _ => None,
        }
    }
}
