use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// Issuer stamped on every access token.
pub const ACCESS_TOKEN_ISSUER: &str = "chirpy-access";

/// Access token claims.
///
/// The claim set is fixed: issuer, subject, issued-at and expiry, all
/// required.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Issuer
    pub iss: String,

    /// Subject (user identifier)
    pub sub: String,

    /// Issued at (Unix timestamp, microsecond fraction)
    pub iat: f64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for a user, valid from `now` for `ttl`.
    pub fn for_user(user_id: Uuid, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            iss: ACCESS_TOKEN_ISSUER.to_string(),
            sub: user_id.to_string(),
            iat: micros_to_seconds(now.timestamp_micros()),
            exp: (now + ttl).timestamp(),
        }
    }

    /// Replace the issue instant, given in microseconds since the epoch.
    pub fn issued_at_micros(mut self, micros: i64) -> Self {
        self.iat = micros_to_seconds(micros);
        self
    }

    /// Check if token is expired.
    ///
    /// A token is no longer valid at its expiry second.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp <= current_timestamp
    }

    /// Parse the subject as a user identifier.
    pub fn subject(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }
}

fn micros_to_seconds(micros: i64) -> f64 {
    micros as f64 / 1_000_000.0
}
