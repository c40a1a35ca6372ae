use thiserror::Error;

use super::user::ValidationFailures;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Record rejected: {0}")]
    Rejected(ValidationFailures),

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },
}

impl DomainError {
    pub fn rejected(failures: impl Into<ValidationFailures>) -> Self {
        Self::Rejected(failures.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Field failures carried by a rejected record, if any
    pub fn failures(&self) -> Option<&ValidationFailures> {
        match self {
            Self::Rejected(failures) => Some(failures),
            _ => None,
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::FieldFailure;

    #[test]
    fn test_not_found_error() {
        let error = DomainError::not_found("User 'abc' not found");
        assert_eq!(error.to_string(), "Not found: User 'abc' not found");
    }

    #[test]
    fn test_conflict_error() {
        let error = DomainError::conflict("Email already exists");
        assert_eq!(error.to_string(), "Conflict: Email already exists");
        assert!(error.is_conflict());
    }

    #[test]
    fn test_rejected_error_lists_failures() {
        let error = DomainError::rejected(vec![
            FieldFailure::NameMissing,
            FieldFailure::EmailTaken,
        ]);

        assert_eq!(
            error.to_string(),
            "Record rejected: Name can't be blank; Email has already been taken"
        );
        assert_eq!(error.failures().map(|f| f.len()), Some(2));
        assert!(!error.is_conflict());
    }
}
