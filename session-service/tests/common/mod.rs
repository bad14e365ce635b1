use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::Authenticator;
use auth::PasswordHasher;
use chrono::DateTime;
use chrono::TimeZone;
use chrono::Utc;
use session_service::domain::clock::Clock;
use session_service::domain::clock::ManualClock;
use session_service::domain::session::errors::SessionError;
use session_service::domain::session::models::EmailAddress;
use session_service::domain::session::models::RefreshToken;
use session_service::domain::session::models::User;
use session_service::domain::session::models::UserId;
use session_service::domain::session::ports::RefreshTokenRepository;
use session_service::domain::session::ports::UserRepository;
use session_service::domain::session::service::SessionService;
use session_service::inbound::http::router::create_router;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// In-memory stand-in for the users table.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    /// Insert a user whose stored hash matches `password`.
    pub fn seed(&self, email: &str, password: &str, now: DateTime<Utc>) -> User {
        let user = User {
            id: UserId::new(),
            email: EmailAddress::new(email.to_string()).expect("Invalid seed email"),
            password_hash: PasswordHasher::new()
                .hash(password)
                .expect("Failed to hash seed password"),
            created_at: now,
            updated_at: now,
        };
        self.users.lock().unwrap().insert(user.id, user.clone());
        user
    }

    pub fn get(&self, id: &UserId) -> Option<User> {
        self.users.lock().unwrap().get(id).cloned()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, SessionError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|user| user.email.as_str() == email)
            .cloned())
    }

    async fn update_credentials(
        &self,
        id: &UserId,
        email: &EmailAddress,
        password_hash: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<User>, SessionError> {
        let mut users = self.users.lock().unwrap();

        if users
            .values()
            .any(|user| user.id != *id && user.email == *email)
        {
            return Err(SessionError::EmailAlreadyExists(email.as_str().to_string()));
        }

        Ok(users.get_mut(id).map(|user| {
            user.email = email.clone();
            user.password_hash = password_hash.to_string();
            user.updated_at = updated_at;
            user.clone()
        }))
    }

    async fn delete_all(&self) -> Result<u64, SessionError> {
        let mut users = self.users.lock().unwrap();
        let count = users.len() as u64;
        users.clear();
        Ok(count)
    }
}

/// In-memory stand-in for the refresh_tokens table.
#[derive(Default)]
pub struct InMemoryRefreshTokenRepository {
    tokens: Mutex<HashMap<String, RefreshToken>>,
}

impl InMemoryRefreshTokenRepository {
    pub fn get(&self, token: &str) -> Option<RefreshToken> {
        self.tokens.lock().unwrap().get(token).cloned()
    }

    pub fn len(&self) -> usize {
        self.tokens.lock().unwrap().len()
    }
}

#[async_trait]
impl RefreshTokenRepository for InMemoryRefreshTokenRepository {
    async fn insert(&self, record: &RefreshToken) -> Result<(), SessionError> {
        self.tokens
            .lock()
            .unwrap()
            .insert(record.token.clone(), record.clone());
        Ok(())
    }

    async fn find_valid_by_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<RefreshToken>, SessionError> {
        Ok(self
            .tokens
            .lock()
            .unwrap()
            .get(token)
            .filter(|record| record.expires_at > now && record.revoked_at.is_none())
            .cloned())
    }

    async fn mark_revoked(&self, token: &str, now: DateTime<Utc>) -> Result<u64, SessionError> {
        let mut tokens = self.tokens.lock().unwrap();
        match tokens.get_mut(token) {
            Some(record) if record.revoked_at.is_none() => {
                record.revoked_at = Some(now);
                record.updated_at = now;
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn delete_all(&self) -> Result<u64, SessionError> {
        let mut tokens = self.tokens.lock().unwrap();
        let count = tokens.len() as u64;
        tokens.clear();
        Ok(count)
    }
}

pub type TestSessionService =
    SessionService<InMemoryUserRepository, InMemoryRefreshTokenRepository, ManualClock>;

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 2, 1, 12, 0, 0).unwrap()
}

/// Service wired to in-memory storage and a hand-driven clock.
pub struct TestContext {
    pub service: Arc<TestSessionService>,
    pub users: Arc<InMemoryUserRepository>,
    pub refresh_tokens: Arc<InMemoryRefreshTokenRepository>,
    pub clock: Arc<ManualClock>,
    pub authenticator: Authenticator,
}

impl TestContext {
    pub fn new(reset_allowed: bool) -> Self {
        let users = Arc::new(InMemoryUserRepository::default());
        let refresh_tokens = Arc::new(InMemoryRefreshTokenRepository::default());
        let clock = Arc::new(ManualClock::new(start_time()));

        let service = Arc::new(SessionService::new(
            Arc::clone(&users),
            Arc::clone(&refresh_tokens),
            Arc::new(Authenticator::new(JWT_SECRET)),
            Arc::clone(&clock),
            reset_allowed,
        ));

        Self {
            service,
            users,
            refresh_tokens,
            clock,
            authenticator: Authenticator::new(JWT_SECRET),
        }
    }

    pub fn seed_user(&self, email: &str, password: &str) -> User {
        self.users.seed(email, password, self.clock.now())
    }
}

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub ctx: TestContext,
    pub api_client: reqwest::Client,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        Self::spawn_with(false).await
    }

    pub async fn spawn_with(reset_allowed: bool) -> Self {
        let ctx = TestContext::new(reset_allowed);

        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let router = create_router(Arc::clone(&ctx.service));

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            ctx,
            api_client: reqwest::Client::new(),
        }
    }

    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Helper to make PUT request with Bearer token
    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .put(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }
}
