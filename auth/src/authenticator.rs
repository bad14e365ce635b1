use std::sync::OnceLock;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use uuid::Uuid;

use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Plaintext behind the decoy hash used for unknown accounts.
const DECOY_PASSWORD: &str = "decoy-password-for-unknown-accounts";

/// Authentication coordinator combining password verification and JWT generation.
///
/// Holds the signing secret for the life of the process. Safe to share
/// across tasks behind an `Arc`.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
    decoy_hash: OnceLock<Option<String>>,
}

/// Authentication operation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for JWT signing
    pub fn new(jwt_secret: &[u8]) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            jwt_handler: JwtHandler::new(jwt_secret),
            decoy_hash: OnceLock::new(),
        }
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `TooLong` - Password exceeds the hashing input ceiling
    /// * `HashingFailed` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Check a plaintext password against a stored hash.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match the hash, or the hash
    ///   is unreadable
    pub fn verify_password(
        &self,
        stored_hash: &str,
        password: &str,
    ) -> Result<(), AuthenticationError> {
        self.password_hasher
            .verify(stored_hash, password)
            .map_err(|_| AuthenticationError::InvalidCredentials)
    }

    /// Reject a login for an account that does not exist.
    ///
    /// Runs a full verification against a decoy hash first, so the caller
    /// spends the same work as for a wrong password.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Always
    pub fn reject_unknown_account(&self, password: &str) -> Result<(), AuthenticationError> {
        let decoy = self
            .decoy_hash
            .get_or_init(|| self.password_hasher.hash(DECOY_PASSWORD).ok());

        if let Some(hash) = decoy {
            // Result discarded.
            let _ = self.password_hasher.verify(hash, password);
        }

        Err(AuthenticationError::InvalidCredentials)
    }

    /// Issue an access token for `subject`.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token generation failed
    pub fn issue_access_token(
        &self,
        subject: Uuid,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<String, JwtError> {
        self.jwt_handler.issue(subject, now, ttl)
    }

    /// Validate an access token and return its subject.
    ///
    /// # Errors
    /// * `InvalidToken` - Token validation failed
    pub fn verify_access_token(&self, token: &str, now: DateTime<Utc>) -> Result<Uuid, JwtError> {
        self.jwt_handler.verify(token, now)
    }
}
