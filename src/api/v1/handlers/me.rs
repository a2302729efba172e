use axum::Json;

use crate::api::v1::extractors::{GrantedPermissions, PermissionsExtractor};

/// GET /me/permissions: the caller's verified area -> level mapping.
pub async fn my_permissions(
    PermissionsExtractor(granted): PermissionsExtractor,
) -> Json<GrantedPermissions> {
    Json(granted)
}
