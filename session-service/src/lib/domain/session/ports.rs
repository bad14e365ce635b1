use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use http::HeaderMap;

use crate::domain::session::models::EmailAddress;
use crate::domain::session::models::LoginCommand;
use crate::domain::session::models::RefreshToken;
use crate::domain::session::models::Session;
use crate::domain::session::models::UpdateCredentialsCommand;
use crate::domain::session::models::User;
use crate::domain::session::models::UserId;
use crate::session::errors::SessionError;

/// Port for session domain service operations.
#[async_trait]
pub trait SessionServicePort: Send + Sync + 'static {
    /// Authenticate by email and password and open a session.
    ///
    /// # Returns
    /// Session with an access token, a new refresh token and the user profile
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password (indistinguishable)
    /// * `Validation` - Negative token lifetime requested
    /// * `DatabaseError` - Database operation failed
    async fn login(&self, command: LoginCommand) -> Result<Session, SessionError>;

    /// Exchange the bearer refresh token for a new access token.
    ///
    /// The refresh token itself is left untouched.
    ///
    /// # Errors
    /// * `Credential` - No usable bearer token in the headers
    /// * `Unauthorized` - Refresh token unknown, expired or revoked
    /// * `DatabaseError` - Database operation failed
    async fn refresh(&self, headers: &HeaderMap) -> Result<String, SessionError>;

    /// Revoke the bearer refresh token.
    ///
    /// # Errors
    /// * `Credential` - No usable bearer token in the headers
    /// * `NotFound` - No unrevoked token matches
    /// * `DatabaseError` - Database operation failed
    async fn revoke(&self, headers: &HeaderMap) -> Result<(), SessionError>;

    /// Replace email and password of the user the bearer access token belongs to.
    ///
    /// # Returns
    /// Updated user
    ///
    /// # Errors
    /// * `Credential` - No usable bearer token in the headers
    /// * `Unauthorized` - Access token invalid, or its user no longer exists
    /// * `Validation` - New password too long
    /// * `EmailAlreadyExists` - Email belongs to another user
    /// * `DatabaseError` - Database operation failed
    async fn update_credentials(
        &self,
        headers: &HeaderMap,
        command: UpdateCredentialsCommand,
    ) -> Result<User, SessionError>;

    /// Delete every user and refresh token. Development platforms only.
    ///
    /// # Errors
    /// * `Forbidden` - Not running on a development platform
    /// * `DatabaseError` - Database operation failed
    async fn reset(&self) -> Result<(), SessionError>;
}

/// Persistence operations for users, limited to what sessions need.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Retrieve user by email address.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, SessionError>;

    /// Overwrite email and password hash of one user.
    ///
    /// # Returns
    /// Updated user (None if no user has this ID)
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email belongs to another user
    /// * `DatabaseError` - Database operation failed
    async fn update_credentials(
        &self,
        id: &UserId,
        email: &EmailAddress,
        password_hash: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<User>, SessionError>;

    /// Remove all users.
    ///
    /// # Returns
    /// Number of deleted users
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn delete_all(&self) -> Result<u64, SessionError>;
}

/// Persistence operations for refresh token records.
///
/// Every method is a single atomic statement.
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync + 'static {
    /// Persist a new record.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn insert(&self, record: &RefreshToken) -> Result<(), SessionError>;

    /// Retrieve the record for `token` if it is unexpired at `now` and unrevoked.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_valid_by_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<RefreshToken>, SessionError>;

    /// Stamp `revoked_at` on the record for `token` unless already revoked.
    ///
    /// # Returns
    /// Rows affected (0 or 1)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn mark_revoked(&self, token: &str, now: DateTime<Utc>) -> Result<u64, SessionError>;

    /// Remove all records.
    ///
    /// # Returns
    /// Number of deleted records
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn delete_all(&self) -> Result<u64, SessionError>;
}
