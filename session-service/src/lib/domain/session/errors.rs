use auth::CredentialError;
use auth::PasswordError;
use thiserror::Error;

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Top-level error for all session operations.
///
/// Authentication failures carry no detail about which check failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    // Value object validation errors (automatically converted via #[from])
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("{0}")]
    Credential(#[from] CredentialError),

    #[error("Validation failed: {0}")]
    Validation(String),

    // Authentication errors
    #[error("Incorrect email or password")]
    InvalidCredentials,

    #[error("Invalid or expired token")]
    Unauthorized,

    // Domain-level errors
    #[error("Refresh token not found")]
    NotFound,

    #[error("Operation not allowed on this platform")]
    Forbidden,

    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),

    // Infrastructure errors
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<PasswordError> for SessionError {
    fn from(err: PasswordError) -> Self {
        match err {
            PasswordError::TooLong { .. } => SessionError::Validation(err.to_string()),
            PasswordError::Mismatch => SessionError::InvalidCredentials,
            PasswordError::HashingFailed(_) => SessionError::Unknown(err.to_string()),
        }
    }
}
