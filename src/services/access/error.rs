/*
 * Responsibility
 * - Typed failures of the access pipeline (token retrieval, verification, rule evaluation)
 * - Each variant knows its HTTP status and a stable machine code
 * - Display is the human-readable detail returned to the client
 *
 * Notes
 * - IntoResponse lives in crate::error together with the other response types
 */
use axum::http::StatusCode;
use thiserror::Error;

use super::token_source::TokenLocation;

/// Failures while obtaining or decoding the token that carries user permissions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Token not found on request {location} using key '{key}'")]
    TokenMissing { location: TokenLocation, key: String },

    #[error("The token is invalid.")]
    TokenMalformed,

    #[error("The token signature is invalid.")]
    SignatureInvalid,

    #[error("The token signature has expired.")]
    SignatureExpired,

    #[error("The token claim is invalid.")]
    ClaimInvalid,

    #[error("User permissions not found at token key '{0}'")]
    PermissionsKeyMissing(String),
}

impl TokenError {
    pub fn missing(location: TokenLocation, key: &str) -> Self {
        Self::TokenMissing {
            location,
            key: key.to_owned(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::PermissionsKeyMissing(_) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::FORBIDDEN,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::TokenMissing { .. } => "TOKEN_MISSING",
            Self::TokenMalformed => "TOKEN_MALFORMED",
            Self::SignatureInvalid => "SIGNATURE_INVALID",
            Self::SignatureExpired => "SIGNATURE_EXPIRED",
            Self::ClaimInvalid => "CLAIM_INVALID",
            Self::PermissionsKeyMissing(_) => "PERMISSIONS_KEY_MISSING",
        }
    }
}

/// Rule evaluation failures: the token was fine, the grant was not.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PermissionError {
    #[error("'{area}' not in user permissions.")]
    AreaNotGranted { area: String },

    #[error("insufficient access level: ({granted}/{required}) on {area}.")]
    InsufficientLevel {
        area: String,
        granted: i64,
        required: i64,
    },
}

impl PermissionError {
    pub fn status(&self) -> StatusCode {
        StatusCode::FORBIDDEN
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::AreaNotGranted { .. } => "AREA_NOT_GRANTED",
            Self::InsufficientLevel { .. } => "INSUFFICIENT_LEVEL",
        }
    }
}

/// Everything a guarded request can be rejected with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Permission(#[from] PermissionError),
}

impl AccessError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Token(e) => e.status(),
            Self::Permission(e) => e.status(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Token(e) => e.code(),
            Self::Permission(e) => e.code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_missing_message_names_location_and_key() {
        let err = TokenError::missing(TokenLocation::Cookie, "Authorization");
        assert_eq!(
            err.to_string(),
            "Token not found on request cookies using key 'Authorization'"
        );
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_permissions_key_missing_is_unauthorized() {
        let err = TokenError::PermissionsKeyMissing("userPermissions".to_string());
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            err.to_string(),
            "User permissions not found at token key 'userPermissions'"
        );
    }

    #[test]
    fn test_access_error_is_transparent() {
        let err: AccessError = PermissionError::AreaNotGranted {
            area: "hr".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "'hr' not in user permissions.");
        assert_eq!(err.code(), "AREA_NOT_GRANTED");
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
    }
}
