use std::sync::Arc;

use crate::domain::clock::Clock;
use crate::domain::session::models::RefreshToken;
use crate::domain::session::models::UserId;
use crate::session::errors::SessionError;
use crate::session::ports::RefreshTokenRepository;

/// Refresh token lifecycle on top of a `RefreshTokenRepository`.
///
/// Keeps no state of its own; every decision is made by the repository query
/// against the injected clock.
pub struct RefreshTokenStore<RR, C>
where
    RR: RefreshTokenRepository,
    C: Clock,
{
    repository: Arc<RR>,
    clock: Arc<C>,
}

impl<RR, C> RefreshTokenStore<RR, C>
where
    RR: RefreshTokenRepository,
    C: Clock,
{
    pub fn new(repository: Arc<RR>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Generate and persist a new refresh token for `user_id`.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    pub async fn issue(&self, user_id: UserId) -> Result<RefreshToken, SessionError> {
        let record = RefreshToken::new(auth::generate_refresh_token(), user_id, self.clock.now());
        self.repository.insert(&record).await?;
        Ok(record)
    }

    /// Resolve a refresh token to its owner.
    ///
    /// # Errors
    /// * `Unauthorized` - Token unknown, expired or revoked
    /// * `DatabaseError` - Database operation failed
    pub async fn lookup(&self, token: &str) -> Result<UserId, SessionError> {
        let now = self.clock.now();

        self.repository
            .find_valid_by_token(token, now)
            .await?
            .filter(|record| record.is_valid_at(now))
            .map(|record| record.user_id)
            .ok_or(SessionError::Unauthorized)
    }

    /// Revoke a refresh token.
    ///
    /// Only the first revocation of a token succeeds. Revoking an unknown or
    /// already revoked token reports `NotFound` and changes nothing.
    ///
    /// # Errors
    /// * `NotFound` - No unrevoked token matches
    /// * `DatabaseError` - Database operation failed
    pub async fn revoke(&self, token: &str) -> Result<(), SessionError> {
        match self.repository.mark_revoked(token, self.clock.now()).await? {
            0 => Err(SessionError::NotFound),
            _ => Ok(()),
        }
    }

    /// Delete every refresh token.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    pub async fn reset(&self) -> Result<u64, SessionError> {
        self.repository.delete_all().await
    }
}
