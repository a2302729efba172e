/*
 * Responsibility
 * - Declarative area/level access control on top of signed tokens
 * - token_source: where the token is; jwt: verify/sign; permissions: claims -> mapping
 * - bearer: the three above bundled; rules: Rule / Area / registry
 */
pub mod bearer;
pub mod error;
pub mod jwt;
pub mod permissions;
pub mod rules;
pub mod token_source;

pub use bearer::TokenBearer;
pub use error::{AccessError, PermissionError, TokenError};
pub use jwt::{Claims, KeyError, TokenIssuer, TokenVerifier, parse_algorithm};
pub use permissions::{AccessLevel, PermissionMap, extract_permissions, root_permissions};
pub use rules::{Area, Rule, make_rule, make_rules};
pub use token_source::{TokenLocation, TokenSource};
