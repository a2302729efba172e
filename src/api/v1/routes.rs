/*
 * Responsibility
 * - v1 URL layout
 * - Which routes are public and which rule guards each guarded route
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::access;
use crate::services::access::make_rules;
use crate::state::AppState;

use crate::api::v1::handlers::{
    finances::{finances_read, finances_write},
    health::{health, root},
    it::{deploy, inventory},
    me::my_permissions,
    session::set_cookies,
};

const AREAS: [&str; 2] = ["finances", "it"];

pub fn routes(state: &AppState) -> Router<AppState> {
    let areas = make_rules(&state.bearer, AREAS);
    let finances = &areas["finances"];
    let it = &areas["it"];

    let public: Router<AppState> = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/set-cookies", get(set_cookies))
        .route("/me/permissions", get(my_permissions));

    let finances_read_routes: Router<AppState> = access::require(
        Router::new().route("/finances/read", get(finances_read)),
        finances.read().clone(),
    );
    let finances_write_routes: Router<AppState> = access::require(
        Router::new().route("/finances/write", get(finances_write)),
        finances.write().clone(),
    );

    // Every /it route needs IT read; deploy also needs IT write.
    let it_routes: Router<AppState> = access::require(
        Router::new().route("/it/deploy", post(deploy)),
        it.write().clone(),
    )
    .route("/it/inventory", get(inventory));
    let it_routes = access::qualified(it_routes, [it.read().clone()]);

    public
        .merge(finances_read_routes)
        .merge(finances_write_routes)
        .merge(it_routes)
}
