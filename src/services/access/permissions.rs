/*
 * Responsibility
 * - Access levels (ordinal, compared with >=)
 * - Pulling the area -> level mapping out of verified claims
 */
use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use super::error::TokenError;
use super::jwt::Claims;

/// Area name -> granted level ordinal, as carried by the token.
pub type PermissionMap = BTreeMap<String, i64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessLevel {
    // TODO: define whether a granted Deny overrides Read/Write before giving it its own evaluation.
    Deny,
    Read,
    Write,
}

impl AccessLevel {
    pub const fn ordinal(self) -> i64 {
        match self {
            Self::Deny => -1,
            Self::Read => 0,
            Self::Write => 1,
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deny => f.write_str("deny"),
            Self::Read => f.write_str("read"),
            Self::Write => f.write_str("write"),
        }
    }
}

/// Read the mapping stored under `key`.
///
/// The entry must be an object whose values are integers; anything else is a malformed claim.
pub fn extract_permissions(claims: &Claims, key: &str) -> Result<PermissionMap, TokenError> {
    let entry = claims
        .get(key)
        .ok_or_else(|| TokenError::PermissionsKeyMissing(key.to_owned()))?;

    let Value::Object(areas) = entry else {
        return Err(TokenError::ClaimInvalid);
    };

    areas
        .iter()
        .map(|(area, level)| {
            level
                .as_i64()
                .map(|level| (area.clone(), level))
                .ok_or(TokenError::ClaimInvalid)
        })
        .collect()
}

// RFC 7519 registered claim names; never areas.
const REGISTERED_CLAIMS: [&str; 7] = ["iss", "sub", "aud", "exp", "nbf", "iat", "jti"];

/// Treat the claims object itself as the mapping.
///
/// Non-integer entries and registered claims such as `exp` are not areas.
pub fn root_permissions(claims: &Claims) -> PermissionMap {
    claims
        .iter()
        .filter(|(area, _)| !REGISTERED_CLAIMS.contains(&area.as_str()))
        .filter_map(|(area, level)| level.as_i64().map(|level| (area.clone(), level)))
        .collect()
}
