use thiserror::Error;

/// Error type for JWT operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    /// Bad signature, expiry, issuer and subject problems all map here.
    #[error("Token is invalid")]
    InvalidToken,
}
