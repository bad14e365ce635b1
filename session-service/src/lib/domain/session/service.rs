use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use http::HeaderMap;

use crate::domain::clock::Clock;
use crate::domain::session::models::EmailAddress;
use crate::domain::session::models::LoginCommand;
use crate::domain::session::models::Session;
use crate::domain::session::models::UpdateCredentialsCommand;
use crate::domain::session::models::User;
use crate::domain::session::models::UserId;
use crate::domain::session::models::ACCESS_TOKEN_TTL;
use crate::domain::session::refresh_store::RefreshTokenStore;
use crate::session::errors::SessionError;
use crate::session::ports::RefreshTokenRepository;
use crate::session::ports::SessionServicePort;
use crate::session::ports::UserRepository;

/// Domain service implementation for session flows.
///
/// Concrete implementation of SessionServicePort with dependency injection.
pub struct SessionService<UR, RR, C>
where
    UR: UserRepository,
    RR: RefreshTokenRepository,
    C: Clock,
{
    users: Arc<UR>,
    refresh_tokens: RefreshTokenStore<RR, C>,
    authenticator: Arc<Authenticator>,
    clock: Arc<C>,
    reset_allowed: bool,
}

impl<UR, RR, C> SessionService<UR, RR, C>
where
    UR: UserRepository,
    RR: RefreshTokenRepository,
    C: Clock,
{
    /// Create a new session service with injected dependencies.
    ///
    /// # Arguments
    /// * `users` - User persistence implementation
    /// * `refresh_tokens` - Refresh token persistence implementation
    /// * `authenticator` - Password hasher and access token codec, holding the signing secret
    /// * `clock` - Time source for every expiry decision
    /// * `reset_allowed` - Whether the administrative reset may run
    pub fn new(
        users: Arc<UR>,
        refresh_tokens: Arc<RR>,
        authenticator: Arc<Authenticator>,
        clock: Arc<C>,
        reset_allowed: bool,
    ) -> Self {
        Self {
            users,
            refresh_tokens: RefreshTokenStore::new(refresh_tokens, Arc::clone(&clock)),
            authenticator,
            clock,
            reset_allowed,
        }
    }

    fn issue_access_token(
        &self,
        user_id: UserId,
        ttl: chrono::Duration,
    ) -> Result<String, SessionError> {
        self.authenticator
            .issue_access_token(user_id.0, self.clock.now(), ttl)
            .map_err(|e| SessionError::Unknown(format!("Token generation failed: {}", e)))
    }

    // Argon2 takes hundreds of milliseconds; keep it off the async workers.
    // No stored hash means no such account, which costs the same and fails.
    async fn verify_password(
        &self,
        stored_hash: Option<String>,
        password: String,
    ) -> Result<(), SessionError> {
        let authenticator = Arc::clone(&self.authenticator);
        tokio::task::spawn_blocking(move || match stored_hash {
            Some(hash) => authenticator.verify_password(&hash, &password),
            None => authenticator.reject_unknown_account(&password),
        })
        .await
            .map_err(|e| SessionError::Unknown(format!("Password check task failed: {}", e)))?
            .map_err(|_| SessionError::InvalidCredentials)
    }

    async fn hash_password(&self, password: String) -> Result<String, SessionError> {
        let authenticator = Arc::clone(&self.authenticator);
        tokio::task::spawn_blocking(move || authenticator.hash_password(&password))
            .await
            .map_err(|e| SessionError::Unknown(format!("Password hashing task failed: {}", e)))?
            .map_err(SessionError::from)
    }
}

#[async_trait]
impl<UR, RR, C> SessionServicePort for SessionService<UR, RR, C>
where
    UR: UserRepository,
    RR: RefreshTokenRepository,
    C: Clock,
{
    async fn login(&self, command: LoginCommand) -> Result<Session, SessionError> {
        let ttl = command.access_token_ttl()?;

        let user = self.users.find_by_email(&command.email).await?;

        self.verify_password(
            user.as_ref().map(|user| user.password_hash.clone()),
            command.password,
        )
        .await?;
        let user = user.ok_or(SessionError::InvalidCredentials)?;

        let access_token = self.issue_access_token(user.id, ttl)?;
        let refresh_token = self.refresh_tokens.issue(user.id).await?;

        Ok(Session {
            user,
            access_token,
            refresh_token,
        })
    }

    async fn refresh(&self, headers: &HeaderMap) -> Result<String, SessionError> {
        let token = auth::extract_bearer(headers)?;
        let user_id = self.refresh_tokens.lookup(token).await?;

        self.issue_access_token(user_id, ACCESS_TOKEN_TTL)
    }

    async fn revoke(&self, headers: &HeaderMap) -> Result<(), SessionError> {
        let token = auth::extract_bearer(headers)?;
        self.refresh_tokens.revoke(token).await
    }

    async fn update_credentials(
        &self,
        headers: &HeaderMap,
        command: UpdateCredentialsCommand,
    ) -> Result<User, SessionError> {
        let token = auth::extract_bearer(headers)?;
        let user_id = self
            .authenticator
            .verify_access_token(token, self.clock.now())
            .map(UserId)
            .map_err(|_| SessionError::Unauthorized)?;

        let email = EmailAddress::new(command.email)?;
        let password_hash = self.hash_password(command.password).await?;

        // Scoped to the verified subject; the request body cannot name another user.
        self.users
            .update_credentials(&user_id, &email, &password_hash, self.clock.now())
            .await?
            .ok_or(SessionError::Unauthorized)
    }

    async fn reset(&self) -> Result<(), SessionError> {
        if !self.reset_allowed {
            return Err(SessionError::Forbidden);
        }

        self.refresh_tokens.reset().await?;
        self.users.delete_all().await?;

        Ok(())
    }
}
