//! Declarative, endpoint-level access control for axum services.
//!
//! A request carries a signed token whose claims map business areas to
//! access levels (`0` read, `1` write). Routes declare the area and minimum
//! level they need through [`services::access::Rule`]s, and
//! [`middleware::access`] rejects requests that fall short.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;

pub use services::access::{
    AccessError, AccessLevel, Area, PermissionError, Rule, TokenBearer, TokenError, TokenIssuer,
    TokenSource, TokenVerifier, make_rule, make_rules,
};
