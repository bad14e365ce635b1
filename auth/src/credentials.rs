//! `Authorization` header parsing.
//!
//! Two schemes are understood: `Bearer <token>` for access and refresh tokens,
//! and `ApiKey <key>` for trusted-service credentials that are not tied to a
//! user.

use http::header::AUTHORIZATION;
use http::HeaderMap;
use thiserror::Error;

pub const BEARER_SCHEME: &str = "Bearer";
pub const API_KEY_SCHEME: &str = "ApiKey";

/// Error type for credential extraction.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("Missing credentials in Authorization header")]
    Missing,

    #[error("Invalid Authorization header format. Expected: {0} <credential>")]
    Malformed(&'static str),
}

/// Extract the token from an `Authorization: Bearer <token>` header.
///
/// # Errors
/// * `Missing` - Header absent, empty, or carries no token after the scheme
/// * `Malformed` - Header does not use the `Bearer` scheme
pub fn extract_bearer(headers: &HeaderMap) -> Result<&str, CredentialError> {
    extract_scheme(headers, BEARER_SCHEME)
}

/// Extract the key from an `Authorization: ApiKey <key>` header.
///
/// # Errors
/// * `Missing` - Header absent, empty, or carries no key after the scheme
/// * `Malformed` - Header does not use the `ApiKey` scheme
pub fn extract_api_key(headers: &HeaderMap) -> Result<&str, CredentialError> {
    extract_scheme(headers, API_KEY_SCHEME)
}

fn extract_scheme<'h>(
    headers: &'h HeaderMap,
    scheme: &'static str,
) -> Result<&'h str, CredentialError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(CredentialError::Missing)?
        .to_str()
        .map_err(|_| CredentialError::Missing)?
        .trim();

    if value.is_empty() {
        return Err(CredentialError::Missing);
    }

    let remainder = value
        .strip_prefix(scheme)
        .ok_or(CredentialError::Malformed(scheme))?;

    // Scheme and credential must be separated, "BearerXYZ" is not a bearer token.
    if !remainder.is_empty() && !remainder.starts_with(char::is_whitespace) {
        return Err(CredentialError::Malformed(scheme));
    }

    match remainder.trim() {
        "" => Err(CredentialError::Missing),
        credential => Ok(credential),
    }
}

#[cfg(test)]
mod tests {
    use http::HeaderValue;

    use super::*;

    fn headers_with(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_extract_bearer() {
        assert_eq!(extract_bearer(&headers_with("Bearer abc123")), Ok("abc123"));
        assert_eq!(
            extract_bearer(&headers_with("Bearer   abc123")),
            Ok("abc123")
        );
        assert_eq!(
            extract_bearer(&headers_with("  Bearer\tabc123  ")),
            Ok("abc123")
        );
    }

    #[test]
    fn test_extract_bearer_missing() {
        assert_eq!(
            extract_bearer(&HeaderMap::new()),
            Err(CredentialError::Missing)
        );
        assert_eq!(
            extract_bearer(&headers_with("")),
            Err(CredentialError::Missing)
        );
        assert_eq!(
            extract_bearer(&headers_with("Bearer")),
            Err(CredentialError::Missing)
        );
        assert_eq!(
            extract_bearer(&headers_with("Bearer    ")),
            Err(CredentialError::Missing)
        );
    }

    #[test]
    fn test_extract_bearer_scheme_is_case_sensitive() {
        assert_eq!(
            extract_bearer(&headers_with("bearer abc123")),
            Err(CredentialError::Malformed("Bearer"))
        );
        assert_eq!(
            extract_bearer(&headers_with("Basic dXNlcjpwYXNz")),
            Err(CredentialError::Malformed("Bearer"))
        );
        assert_eq!(
            extract_bearer(&headers_with("Bearerabc123")),
            Err(CredentialError::Malformed("Bearer"))
        );
    }

    #[test]
    fn test_extract_api_key() {
        assert_eq!(
            extract_api_key(&headers_with("ApiKey f271c81ff7084ee5b99a5091b42d486e")),
            Ok("f271c81ff7084ee5b99a5091b42d486e")
        );
        assert_eq!(
            extract_api_key(&headers_with("ApiKey")),
            Err(CredentialError::Missing)
        );
        assert_eq!(
            extract_api_key(&headers_with("Bearer abc123")),
            Err(CredentialError::Malformed("ApiKey"))
        );
    }
}
