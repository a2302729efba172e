//! Rule guards: evaluate a `Rule` before the handler runs.
//!
//! On success the verified mapping is stored in the request extensions as
//! `GrantedPermissions`, so handlers can read it with `PermissionsExtractor`.
//! On failure the request is answered with the `AccessError` response.
//!
//! ```ignore
//! let finances = make_rule(&state.bearer, "finances");
//! let router = access::require(
//!     Router::new().route("/finances/write", post(finances_write)),
//!     finances.write().clone(),
//! );
//! ```

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::GrantedPermissions;
use crate::services::access::{AccessError, Rule};

/// Guard every route currently in `router` with `rule`.
///
/// Routes added to the router afterwards are not guarded.
pub fn require<S>(router: Router<S>, rule: Rule) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    // route_layer: unmatched paths still fall through to 404 instead of 403
    router.route_layer(middleware::from_fn_with_state(rule, rule_guard))
}

/// Guard every route of `router` with all of `rules`.
pub fn qualified<S, I>(router: Router<S>, rules: I) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    I: IntoIterator<Item = Rule>,
{
    rules.into_iter().fold(router, require)
}

async fn rule_guard(
    State(rule): State<Rule>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AccessError> {
    let permissions = match rule.authorize(req.headers()) {
        Ok(permissions) => permissions,
        Err(err) => {
            tracing::warn!(
                area = rule.area(),
                level = %rule.level(),
                error = %err,
                "access denied"
            );
            return Err(err);
        }
    };

    tracing::debug!(area = rule.area(), level = %rule.level(), "access granted");

    req.extensions_mut()
        .insert(GrantedPermissions::new(permissions));

    Ok(next.run(req).await)
}
