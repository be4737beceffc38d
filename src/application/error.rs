//! # Application Errors
//!
//! Error types for the application layer.
//!
//! These errors represent failures that can occur during use case execution:
//! request validation, domain rule violations, missing references, natural-key
//! conflicts and storage failures.

use crate::domain::errors::DomainError;
use crate::infrastructure::persistence::RepositoryError;
use thiserror::Error;

/// Application layer error.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Request validation failed.
    #[error("validation error: {0}")]
    ValidationError(String),

    /// Domain error.
    #[error("domain error: {0}")]
    DomainError(#[from] DomainError),

    /// Referenced record does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of record that was looked up.
        entity: &'static str,
        /// Identifier that was looked up.
        id: String,
    },

    /// Natural key already held by another record.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Repository error.
    #[error("repository error: {0}")]
    RepositoryError(String),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// Creates a not found error.
    #[must_use]
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Creates a conflict error.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    /// Creates a repository error.
    #[must_use]
    pub fn repository(message: impl Into<String>) -> Self {
        Self::RepositoryError(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns true if the caller sent an invalid request.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::ValidationError(_) | Self::NotFound { .. } | Self::Conflict(_) => true,
            Self::DomainError(e) => e.is_validation_error() || e.is_state_error(),
            Self::RepositoryError(_) | Self::Internal(_) => false,
        }
    }
}

impl From<RepositoryError> for ApplicationError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity_type, id } => Self::NotFound {
                entity: entity_type,
                id,
            },
            RepositoryError::Duplicate { entity_type, key } => {
                Self::Conflict(format!("{entity_type} with {key} already exists"))
            }
            other => Self::RepositoryError(other.to_string()),
        }
    }
}

/// Result type for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn application_error_validation() {
        let err = ApplicationError::validation("name cannot be empty");
        assert!(err.to_string().contains("name cannot be empty"));
        assert!(err.is_client_error());
    }

    #[test]
    fn application_error_not_found() {
        let err = ApplicationError::not_found("wallet type", "abc");
        assert_eq!(err.to_string(), "wallet type not found: abc");
    }

    #[test]
    fn application_error_repository() {
        let err = ApplicationError::repository("database connection failed");
        assert!(err.to_string().contains("database connection failed"));
        assert!(!err.is_client_error());
    }

    #[test]
    fn application_error_from_domain_error() {
        let domain_err = DomainError::InvalidAddress("0x12".to_string());
        let app_err: ApplicationError = domain_err.into();
        assert!(app_err.to_string().contains("0x12"));
        assert!(app_err.is_client_error());
    }

    #[test]
    fn arithmetic_domain_error_is_server_side() {
        let app_err: ApplicationError = DomainError::Overflow.into();
        assert!(!app_err.is_client_error());
    }

    #[test]
    fn duplicate_becomes_conflict() {
        let err: ApplicationError =
            RepositoryError::duplicate("wallets_type", "name=Ledger").into();
        assert!(matches!(err, ApplicationError::Conflict(_)));
        assert!(err.to_string().contains("name=Ledger"));
    }

    #[test]
    fn missing_record_becomes_not_found() {
        let err: ApplicationError = RepositoryError::not_found("wallets_wallet", "42").into();
        assert!(matches!(err, ApplicationError::NotFound { .. }));
    }

    #[test]
    fn query_failure_stays_repository() {
        let err: ApplicationError = RepositoryError::query("syntax error").into();
        assert!(matches!(err, ApplicationError::RepositoryError(_)));
    }
}
