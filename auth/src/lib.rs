//! Authentication primitives for the session service
//!
//! - Password hashing (Argon2id, 72-byte input ceiling)
//! - Access tokens (HS256 JWT with fixed issuer, subject, issued-at and expiry)
//! - Opaque refresh token generation
//! - `Authorization` header parsing (`Bearer` and `ApiKey` schemes)
//!
//! Nothing here performs I/O or reads the system clock for token decisions;
//! callers pass `now` explicitly.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify(&hash, "my_password").is_ok());
//! ```
//!
//! ## Access Tokens
//! ```
//! use auth::JwtHandler;
//! use chrono::{Duration, Utc};
//! use uuid::Uuid;
//!
//! let handler = JwtHandler::new(b"secret_key_at_least_32_bytes_long!");
//! let user_id = Uuid::new_v4();
//! let now = Utc::now();
//! let token = handler.issue(user_id, now, Duration::hours(1)).unwrap();
//! assert_eq!(handler.verify(&token, now).unwrap(), user_id);
//! ```

pub mod authenticator;
pub mod credentials;
pub mod jwt;
pub mod password;
pub mod refresh;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use credentials::extract_api_key;
pub use credentials::extract_bearer;
pub use credentials::CredentialError;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use refresh::generate_refresh_token;
