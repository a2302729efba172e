/*!
 * Granted permissions extractor
 *
 * Responsibility:
 * - Hand the verified area -> level mapping to handlers
 * - axum dependent code lives in core, the contract type in types
 *
 * Public API:
 * - GrantedPermissions
 * - PermissionsExtractor
 */

mod core;
mod types;

pub use self::core::PermissionsExtractor;
pub use self::types::GrantedPermissions;
