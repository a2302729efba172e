//! Where the raw token lives on an inbound request.
//!
//! The key is the header name or cookie name (`Authorization` by default).
//! Values may carry a `Bearer ` prefix in any case; only the last
//! space-separated segment is kept in that case.

use std::fmt;

use axum::http::HeaderMap;
use axum_extra::extract::cookie::CookieJar;

use super::error::TokenError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenLocation {
    Header,
    Cookie,
}

impl fmt::Display for TokenLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Header => f.write_str("headers"),
            Self::Cookie => f.write_str("cookies"),
        }
    }
}

/// Token retrieval strategy, chosen once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSource {
    Header(String),
    Cookie(String),
    /// Cookie first, then header.
    Either(String),
}

impl TokenSource {
    pub fn header(key: impl Into<String>) -> Self {
        Self::Header(key.into())
    }

    pub fn cookie(key: impl Into<String>) -> Self {
        Self::Cookie(key.into())
    }

    pub fn either(key: impl Into<String>) -> Self {
        Self::Either(key.into())
    }

    pub fn key(&self) -> &str {
        match self {
            Self::Header(key) | Self::Cookie(key) | Self::Either(key) => key,
        }
    }

    /// Get the raw token (without any `Bearer` prefix) from the request headers.
    pub fn retrieve(&self, headers: &HeaderMap) -> Result<String, TokenError> {
        match self {
            Self::Header(key) => from_header(headers, key),
            Self::Cookie(key) => from_cookie(headers, key),
            Self::Either(key) => from_cookie(headers, key).or_else(|_| from_header(headers, key)),
        }
    }
}

fn from_header(headers: &HeaderMap, key: &str) -> Result<String, TokenError> {
    headers
        .get(key)
        .and_then(|v| v.to_str().ok())
        .and_then(split_token)
        .ok_or_else(|| TokenError::missing(TokenLocation::Header, key))
}

fn from_cookie(headers: &HeaderMap, key: &str) -> Result<String, TokenError> {
    let jar = CookieJar::from_headers(headers);

    jar.get(key)
        .and_then(|cookie| split_token(cookie.value().trim_matches('"')))
        .ok_or_else(|| TokenError::missing(TokenLocation::Cookie, key))
}

fn split_token(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let token = match raw.rsplit_once(' ') {
        Some((scheme, token)) if scheme.to_ascii_lowercase().contains("bearer") => token,
        _ => raw,
    };

    (!token.is_empty()).then(|| token.to_owned())
}
