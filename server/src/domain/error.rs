//! Domain error taxonomy
//!
//! Outcome of a domain operation that did not succeed. The API layer
//! maps these onto HTTP responses; storage failures pass through as
//! `Data` and surface as internal errors.

use thiserror::Error;

use crate::data::error::DataError;

#[derive(Error, Debug)]
pub enum DomainError {
    /// Input failed a business rule (HTTP 400)
    #[error("{0}")]
    Validation(String),

    /// Caller is authenticated but not allowed (HTTP 403)
    #[error("{0}")]
    Forbidden(String),

    /// Referenced entity does not exist (HTTP 404)
    #[error("{0}")]
    NotFound(String),

    /// Operation conflicts with current state (HTTP 409)
    #[error("{0}")]
    Conflict(String),

    /// Storage layer failure (HTTP 500)
    #[error(transparent)]
    Data(DataError),
}

/// Storage-level conflicts (unique constraint races) keep their 409
/// semantics; every other data error is an internal failure.
impl From<DataError> for DomainError {
    fn from(e: DataError) -> Self {
        match e {
            DataError::Conflict(msg) => Self::Conflict(msg),
            other => Self::Data(other),
        }
    }
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_conflict_converts_to_conflict() {
        let err: DomainError = DataError::Conflict("duplicate grant".to_string()).into();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn test_other_data_errors_stay_internal() {
        let err: DomainError = DataError::Config("bad path".to_string()).into();
        assert!(matches!(err, DomainError::Data(_)));
    }
}
