/*
 * Responsibility
 * - Request extractors shared by v1 handlers
 */
mod permissions;

pub use permissions::{GrantedPermissions, PermissionsExtractor};
