use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::services::access::AccessError;
use crate::state::AppState;

use super::GrantedPermissions;

/// Handler-side access to the caller's permissions.
///
/// Behind a rule guard the mapping is already in request extensions.
/// On unguarded routes the application bearer verifies the token here instead,
/// so a missing or invalid token is rejected the same way a guard would.
pub struct PermissionsExtractor(pub GrantedPermissions);

impl FromRequestParts<AppState> for PermissionsExtractor {
    type Rejection = AccessError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(granted) = parts.extensions.get::<GrantedPermissions>() {
            return Ok(Self(granted.clone()));
        }

        let permissions = state.bearer.permissions(&parts.headers)?;
        Ok(Self(GrantedPermissions::new(permissions)))
    }
}
