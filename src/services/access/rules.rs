//! Endpoint-level access rules.
//!
//! A [`Rule`] says "this endpoint needs at least `level` on `area`". Rules are
//! built once when routes are registered and then evaluated for every request:
//!
//! ```ignore
//! let bearer = Arc::new(TokenBearer::new(TokenSource::either("Authorization"), verifier));
//! let areas = make_rules(&bearer, ["finances", "it"]);
//!
//! let router = middleware::access::require(
//!     Router::new().route("/finances/read", get(finances_read)),
//!     areas["finances"].read().clone(),
//! );
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use axum::http::HeaderMap;

use super::bearer::TokenBearer;
use super::error::{AccessError, PermissionError};
use super::permissions::{AccessLevel, PermissionMap};

#[derive(Debug, Clone)]
pub struct Rule {
    area: Arc<str>,
    level: AccessLevel,
    bearer: Arc<TokenBearer>,
}

impl Rule {
    pub fn new(area: impl Into<String>, level: AccessLevel, bearer: Arc<TokenBearer>) -> Self {
        let area: String = area.into();
        Self {
            area: area.into(),
            level,
            bearer,
        }
    }

    pub fn area(&self) -> &str {
        &self.area
    }

    pub fn level(&self) -> AccessLevel {
        self.level
    }

    pub fn bearer(&self) -> &Arc<TokenBearer> {
        &self.bearer
    }

    /// Evaluate the rule against an already verified permission mapping.
    pub fn check(&self, permissions: &PermissionMap) -> Result<(), PermissionError> {
        let Some(&granted) = permissions.get(self.area()) else {
            return Err(PermissionError::AreaNotGranted {
                area: self.area().to_owned(),
            });
        };

        let required = self.level.ordinal();
        if granted < required {
            return Err(PermissionError::InsufficientLevel {
                area: self.area().to_owned(),
                granted,
                required,
            });
        }

        Ok(())
    }

    /// Full per-request evaluation: token lookup, verification, then `check`.
    ///
    /// Returns the verified mapping so callers can hand it to handlers.
    pub fn authorize(&self, headers: &HeaderMap) -> Result<PermissionMap, AccessError> {
        let permissions = self.bearer.permissions(headers)?;
        self.check(&permissions)?;
        Ok(permissions)
    }
}

/// Business area: a read rule and a write rule sharing one bearer.
#[derive(Debug, Clone)]
pub struct Area {
    name: String,
    read: Rule,
    write: Rule,
}

impl Area {
    pub fn new(name: impl Into<String>, bearer: Arc<TokenBearer>) -> Self {
        let name = name.into();
        Self {
            read: Rule::new(name.clone(), AccessLevel::Read, Arc::clone(&bearer)),
            write: Rule::new(name.clone(), AccessLevel::Write, bearer),
            name,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn read(&self) -> &Rule {
        &self.read
    }

    pub fn write(&self) -> &Rule {
        &self.write
    }
}

pub fn make_rule(bearer: &Arc<TokenBearer>, area: &str) -> Area {
    Area::new(area, Arc::clone(bearer))
}

/// One [`Area`] per distinct name, keyed by that name.
pub fn make_rules<I, S>(bearer: &Arc<TokenBearer>, areas: I) -> HashMap<String, Area>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    areas
        .into_iter()
        .map(|area| {
            let area = Area::new(area, Arc::clone(bearer));
            (area.name().to_owned(), area)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::Algorithm;

    use crate::services::access::jwt::TokenVerifier;
    use crate::services::access::token_source::TokenSource;

    fn bearer() -> Arc<TokenBearer> {
        let verifier = TokenVerifier::new("test_secret_key_for_testing_purposes", Algorithm::HS256)
            .unwrap();
        Arc::new(
            TokenBearer::new(TokenSource::either("Authorization"), verifier)
                .with_permissions_key("userPermissions"),
        )
    }

    fn granted(pairs: &[(&str, i64)]) -> PermissionMap {
        pairs
            .iter()
            .map(|(area, level)| (area.to_string(), *level))
            .collect()
    }

    #[test]
    fn test_read_grant_fails_write_rule() {
        let rule = Rule::new("finances", AccessLevel::Write, bearer());

        let err = rule.check(&granted(&[("finances", 0)])).unwrap_err();
        assert_eq!(
            err,
            PermissionError::InsufficientLevel {
                area: "finances".to_string(),
                granted: 0,
                required: 1,
            }
        );
        assert_eq!(err.to_string(), "insufficient access level: (0/1) on finances.");
    }

    #[test]
    fn test_read_grant_passes_read_rule() {
        let rule = Rule::new("finances", AccessLevel::Read, bearer());
        assert!(rule.check(&granted(&[("finances", 0)])).is_ok());
    }

    #[test]
    fn test_write_grant_passes_read_rule() {
        let rule = Rule::new("finances", AccessLevel::Read, bearer());
        assert!(rule.check(&granted(&[("finances", 1)])).is_ok());
    }

    #[test]
    fn test_absent_area() {
        let rule = Rule::new("hr", AccessLevel::Read, bearer());

        let err = rule.check(&granted(&[("finances", 1)])).unwrap_err();
        assert_eq!(
            err,
            PermissionError::AreaNotGranted {
                area: "hr".to_string()
            }
        );
        assert_eq!(err.to_string(), "'hr' not in user permissions.");
    }

    #[test]
    fn test_deny_grant_fails_read_rule() {
        let rule = Rule::new("it", AccessLevel::Read, bearer());

        let err = rule.check(&granted(&[("it", -1)])).unwrap_err();
        assert!(matches!(err, PermissionError::InsufficientLevel { granted: -1, .. }));
    }

    #[test]
    fn test_authorize_without_token() {
        let rule = Rule::new("finances", AccessLevel::Read, bearer());

        let err = rule.authorize(&HeaderMap::new()).unwrap_err();
        assert!(matches!(err, AccessError::Token(_)));
    }

    #[test]
    fn test_make_rule() {
        let bearer = bearer();
        let area = make_rule(&bearer, "test");

        assert_eq!(area.name(), "test");
        assert_eq!(area.read().area(), "test");
        assert_eq!(area.read().level(), AccessLevel::Read);
        assert_eq!(area.write().area(), "test");
        assert_eq!(area.write().level(), AccessLevel::Write);
    }

    #[test]
    fn test_make_rules_single_area() {
        let areas = make_rules(&bearer(), ["test_1"]);

        assert_eq!(areas.len(), 1);
        assert_eq!(areas["test_1"].name(), "test_1");
    }

    #[test]
    fn test_make_rules_multiple_areas() {
        let bearer = bearer();
        let areas = make_rules(&bearer, ["a", "b"]);

        let mut names: Vec<&str> = areas.keys().map(String::as_str).collect();
        names.sort_unstable();
        assert_eq!(names, ["a", "b"]);

        for (name, area) in &areas {
            assert_eq!(area.name(), name);
            assert_eq!(area.read().level(), AccessLevel::Read);
            assert_eq!(area.write().level(), AccessLevel::Write);
            assert!(Arc::ptr_eq(area.read().bearer(), &bearer));
            assert!(Arc::ptr_eq(area.write().bearer(), &bearer));
        }
    }

    #[test]
    fn test_make_rules_collapses_duplicates() {
        let areas = make_rules(&bearer(), vec!["a".to_string(), "a".to_string()]);
        assert_eq!(areas.len(), 1);
    }
}
