use rand::RngCore;

/// Random bytes behind each refresh token.
pub const REFRESH_TOKEN_BYTES: usize = 32;

/// Generate an opaque refresh token.
///
/// # Returns
/// 64 lowercase hex characters encoding 256 random bits
pub fn generate_refresh_token() -> String {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
