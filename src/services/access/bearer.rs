use axum::http::HeaderMap;

use super::error::TokenError;
use super::jwt::{Claims, TokenVerifier};
use super::permissions::{PermissionMap, extract_permissions, root_permissions};
use super::token_source::TokenSource;

/// Token retrieval + verification + permission lookup, shared by every rule.
///
/// Without a permissions key the whole claims object is read as the mapping.
#[derive(Debug, Clone)]
pub struct TokenBearer {
    source: TokenSource,
    verifier: TokenVerifier,
    permissions_key: Option<String>,
}

impl TokenBearer {
    pub fn new(source: TokenSource, verifier: TokenVerifier) -> Self {
        Self {
            source,
            verifier,
            permissions_key: None,
        }
    }

    pub fn with_permissions_key(mut self, key: impl Into<String>) -> Self {
        self.permissions_key = Some(key.into());
        self
    }

    pub fn source(&self) -> &TokenSource {
        &self.source
    }

    pub fn permissions_key(&self) -> Option<&str> {
        self.permissions_key.as_deref()
    }

    pub fn claims(&self, headers: &HeaderMap) -> Result<Claims, TokenError> {
        let token = self.source.retrieve(headers)?;
        self.verifier.decode(&token)
    }

    pub fn permissions(&self, headers: &HeaderMap) -> Result<PermissionMap, TokenError> {
        let claims = self.claims(headers)?;

        match self.permissions_key() {
            Some(key) => extract_permissions(&claims, key),
            None => Ok(root_permissions(&claims)),
        }
    }
}
