//! Error types for CloudVault.

use thiserror::Error;

/// Common error type for CloudVault.
#[derive(Error, Debug)]
pub enum VaultError {
    /// Database error.
    ///
    /// Generic database error wrapping failures from sqlx. Storage-layer
    /// failures are surfaced as-is and never converted into authorization
    /// failures.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Authentication error (missing/invalid/expired token, bad credentials).
    #[error("authentication error: {0}")]
    Auth(String),

    /// Permission denied (authenticated but insufficient role).
    #[error("permission denied: {0}")]
    Permission(String),

    /// Validation error for user input (malformed role, resource reference).
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Conflicting resource already exists (duplicate registration).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Public link past its expiry timestamp.
    #[error("expired: {0}")]
    Expired(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

// Conversion from sqlx errors
impl From<sqlx::Error> for VaultError {
    fn from(e: sqlx::Error) -> Self {
        VaultError::Database(e.to_string())
    }
}

/// Result type alias for CloudVault operations.
pub type Result<T> = std::result::Result<T, VaultError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_display() {
        let err = VaultError::Auth("invalid token".to_string());
        assert_eq!(err.to_string(), "authentication error: invalid token");
    }

    #[test]
    fn test_permission_error_display() {
        let err = VaultError::Permission("delete requires owner".to_string());
        assert_eq!(err.to_string(), "permission denied: delete requires owner");
    }

    #[test]
    fn test_not_found_error_display() {
        let err = VaultError::NotFound("file".to_string());
        assert_eq!(err.to_string(), "file not found");
    }

    #[test]
    fn test_conflict_error_display() {
        let err = VaultError::Conflict("email already exists".to_string());
        assert_eq!(err.to_string(), "conflict: email already exists");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: VaultError = io_err.into();
        assert!(matches!(err, VaultError::Io(_)));
    }
}
