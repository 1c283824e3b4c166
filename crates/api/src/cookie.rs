//! Session cookie plumbing.
//!
//! The session rides in an `HttpOnly` cookie so browser scripts never
//! see the token. `SameSite=Lax` keeps cross-site POSTs out.

use axum::http::{header, HeaderMap};
use chrono::Duration;

use assetgate_sessions::SessionToken;

pub const SESSION_COOKIE: &str = "assetgate_session";

/// Attributes shared by every cookie the API sets.
#[derive(Debug, Clone, Copy)]
pub struct CookieOptions {
    pub secure: bool,
}

/// Extract the session token from the `Cookie` header, if present and
/// well formed. A malformed token is treated as no token at all.
pub fn session_token(headers: &HeaderMap) -> Option<SessionToken> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| SessionToken::parse(value).ok())
}

/// `Set-Cookie` value that installs a session for `ttl`.
pub fn issue(token: &SessionToken, ttl: Duration, opts: CookieOptions) -> String {
    let mut cookie = format!(
        "{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        token.expose(),
        ttl.num_seconds()
    );
    if opts.secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that removes the session cookie.
pub fn clear(opts: CookieOptions) -> String {
    let mut cookie =
        format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    if opts.secure {
        cookie.push_str("; Secure");
    }
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn finds_the_session_among_other_cookies() {
        let token = SessionToken::generate();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!(
                "theme=dark; {SESSION_COOKIE}={}; lang=en",
                token.expose()
            ))
            .unwrap(),
        );
        assert_eq!(session_token(&headers), Some(token));
    }

    #[test]
    fn malformed_or_missing_cookies_yield_none() {
        let mut headers = HeaderMap::new();
        assert_eq!(session_token(&headers), None);

        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("assetgate_session=not-hex"),
        );
        assert_eq!(session_token(&headers), None);
    }

    #[test]
    fn issue_and_clear_carry_the_hardening_attributes() {
        let token = SessionToken::generate();
        let set = issue(&token, Duration::days(5), CookieOptions { secure: true });
        assert!(set.contains("HttpOnly"));
        assert!(set.contains("SameSite=Lax"));
        assert!(set.contains("Secure"));
        assert!(set.contains("Max-Age=432000"));

        let cleared = clear(CookieOptions { secure: false });
        assert!(cleared.contains("Max-Age=0"));
        assert!(!cleared.contains("Secure"));
    }
}
