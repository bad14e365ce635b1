use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use uuid::Uuid;

use crate::session::errors::EmailError;
use crate::session::errors::SessionError;

/// Upper bound, and default, for access token lifetimes.
pub const ACCESS_TOKEN_TTL: Duration = Duration::hours(1);

/// Refresh tokens expire this long after they are created.
pub const REFRESH_TOKEN_TTL: Duration = Duration::days(60);

/// Registered user, as far as sessions are concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: EmailAddress,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Persisted refresh token record.
///
/// Only `revoked_at` (and `updated_at` with it) ever changes after insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshToken {
    pub token: String,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl RefreshToken {
    /// Build a fresh, unrevoked record created at `now`.
    pub fn new(token: String, user_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            token,
            user_id,
            created_at: now,
            updated_at: now,
            expires_at: now + REFRESH_TOKEN_TTL,
            revoked_at: None,
        }
    }

    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    /// Usable for refresh at `now`: unexpired and not revoked.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_revoked() && self.expires_at > now
    }
}

/// Login request in domain terms.
///
/// The email is kept raw: a malformed address must fail exactly like an
/// unknown one.
#[derive(Debug)]
pub struct LoginCommand {
    pub email: String,
    pub password: String,
    pub expires_in_seconds: Option<i64>,
}

impl LoginCommand {
    pub fn new(email: String, password: String, expires_in_seconds: Option<i64>) -> Self {
        Self {
            email,
            password,
            expires_in_seconds,
        }
    }

    /// Resolve the requested access token lifetime.
    ///
    /// Absent or zero means the default hour, anything longer is cut down to
    /// an hour.
    ///
    /// # Errors
    /// * `Validation` - Negative lifetime requested
    pub fn access_token_ttl(&self) -> Result<Duration, SessionError> {
        match self.expires_in_seconds {
            None | Some(0) => Ok(ACCESS_TOKEN_TTL),
            Some(seconds) if seconds < 0 => Err(SessionError::Validation(
                "expires_in_seconds must not be negative".to_string(),
            )),
            Some(seconds) if seconds >= ACCESS_TOKEN_TTL.num_seconds() => Ok(ACCESS_TOKEN_TTL),
            Some(seconds) => Ok(Duration::seconds(seconds)),
        }
    }
}

/// Command to replace the caller's own email and password.
///
/// The email is validated only once the caller is authenticated.
#[derive(Debug)]
pub struct UpdateCredentialsCommand {
    pub email: String,
    pub password: String,
}

impl UpdateCredentialsCommand {
    pub fn new(email: String, password: String) -> Self {
        Self { email, password }
    }
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub access_token: String,
    pub refresh_token: RefreshToken,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn login_with(expires_in_seconds: Option<i64>) -> LoginCommand {
        LoginCommand::new(
            "a@b.com".to_string(),
            "secret".to_string(),
            expires_in_seconds,
        )
    }

    #[test]
    fn test_access_token_ttl_is_clamped() {
        assert_eq!(login_with(None).access_token_ttl(), Ok(Duration::hours(1)));
        assert_eq!(login_with(Some(0)).access_token_ttl(), Ok(Duration::hours(1)));
        assert_eq!(
            login_with(Some(60)).access_token_ttl(),
            Ok(Duration::seconds(60))
        );
        assert_eq!(
            login_with(Some(3600)).access_token_ttl(),
            Ok(Duration::hours(1))
        );
        assert_eq!(
            login_with(Some(86_400)).access_token_ttl(),
            Ok(Duration::hours(1))
        );
        assert_eq!(
            login_with(Some(i64::MAX)).access_token_ttl(),
            Ok(Duration::hours(1))
        );
        assert!(matches!(
            login_with(Some(-1)).access_token_ttl(),
            Err(SessionError::Validation(_))
        ));
    }

    #[test]
    fn test_refresh_token_lifetime() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let record = RefreshToken::new("ab".repeat(32), UserId::new(), now);

        assert_eq!(record.expires_at - record.created_at, Duration::days(60));
        assert!(record.is_valid_at(now));
        assert!(record.is_valid_at(now + Duration::days(60) - Duration::seconds(1)));
        assert!(!record.is_valid_at(now + Duration::days(60)));
    }

    #[test]
    fn test_revoked_refresh_token_is_invalid() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut record = RefreshToken::new("ab".repeat(32), UserId::new(), now);
        record.revoked_at = Some(now);

        assert!(record.is_revoked());
        assert!(!record.is_valid_at(now));
    }

    #[test]
    fn test_email_validation() {
        assert!(EmailAddress::new("a@b.com".to_string()).is_ok());
        assert!(matches!(
            EmailAddress::new("not-an-email".to_string()),
            Err(EmailError::InvalidFormat(_))
        ));
    }
}
