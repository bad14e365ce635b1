use std::sync::atomic::AtomicI64;
use std::sync::atomic::Ordering;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use uuid::Uuid;

use super::claims::Claims;
use super::claims::ACCESS_TOKEN_ISSUER;
use super::errors::JwtError;

/// Access token codec.
///
/// Signs and verifies HS256 tokens with a symmetric secret fixed at
/// construction. Time is always passed in by the caller, so expiry follows
/// whatever clock the caller uses.
///
/// Issue instants are strictly increasing per handler, at microsecond
/// resolution, so two tokens for the same subject never encode identically.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    last_issued_micros: AtomicI64,
}

impl JwtHandler {
    /// Create a new JWT handler with a secret key.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens (should be stored securely)
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            last_issued_micros: AtomicI64::new(i64::MIN),
        }
    }

    /// Issue a signed access token for `subject`, valid from `now` for `ttl`.
    ///
    /// The lifetime is used as given; callers enforce any upper bound.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue(
        &self,
        subject: Uuid,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<String, JwtError> {
        let claims = Claims::for_user(subject, now, ttl)
            .issued_at_micros(self.next_issue_instant(now.timestamp_micros()));
        self.encode(&claims)
    }

    /// `requested`, or one microsecond past the last issued instant if that
    /// is not earlier.
    fn next_issue_instant(&self, requested: i64) -> i64 {
        let advance = |last: i64| requested.max(last.saturating_add(1));
        let previous = self
            .last_issued_micros
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| Some(advance(last)))
            .unwrap_or_else(|last| last);
        advance(previous)
    }

    /// Verify a token and return its subject.
    ///
    /// # Errors
    /// * `InvalidToken` - Signature, expiry, issuer or subject check failed
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Uuid, JwtError> {
        let claims = self.decode(token)?;

        if claims.is_expired(now.timestamp()) {
            return Err(JwtError::InvalidToken);
        }

        claims.subject().ok_or(JwtError::InvalidToken)
    }

    /// Encode claims into a JWT token.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn encode(&self, claims: &Claims) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Check signature and issuer, and decode the claims.
    ///
    /// Expiry is not checked here.
    fn decode(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        // Expiry is evaluated against the caller's clock in `verify`.
        validation.validate_exp = false;
        validation.set_issuer(&[ACCESS_TOKEN_ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|token_data| token_data.claims)
            .map_err(|_| JwtError::InvalidToken)
    }
}
