use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raw entropy per token: 32 bytes (256 bits), hex-encoded.
const TOKEN_BYTES: usize = 32;

/// An opaque session token.
///
/// Held by the caller (typically in an httpOnly cookie) as the sole
/// proof of a session. The `Debug` impl redacts the value so tokens
/// cannot leak through logs.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("malformed session token")]
pub struct TokenParseError;

impl SessionToken {
    /// Generate a fresh token from the OS entropy source.
    pub fn generate() -> Self {
        use rand::RngCore;

        let mut bytes = [0u8; TOKEN_BYTES];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    /// Parse a token presented by a caller.
    ///
    /// Failure here means the value is *malformed* (tampered transport,
    /// wrong cookie) — a different situation from a well-formed token
    /// that simply no longer resolves to a session.
    pub fn parse(raw: &str) -> Result<Self, TokenParseError> {
        if raw.len() != TOKEN_BYTES * 2 || !raw.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(TokenParseError);
        }
        Ok(Self(raw.to_ascii_lowercase()))
    }

    /// The wire value, e.g. for a Set-Cookie header.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("SessionToken(..)")
    }
}
