/*
 * Responsibility
 * - GET /set-cookies: issue a demo permission token and store it as a cookie
 * - The cookie name is the configured token key, the value `Bearer <jwt>`
 */
use axum::{Json, extract::State, response::IntoResponse};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use chrono::{DateTime, TimeDelta, Utc};
use serde_json::{Value, json};

use crate::error::AppError;
use crate::services::access::{AccessLevel, Claims};
use crate::state::AppState;

fn demo_claims(permissions_key: Option<&str>) -> Claims {
    let mut areas = Claims::new();
    areas.insert("finances".to_owned(), json!(AccessLevel::Read.ordinal()));
    areas.insert("it".to_owned(), json!(AccessLevel::Write.ordinal()));

    let mut claims = Claims::new();
    claims.insert("username".to_owned(), json!("JohnDoe"));
    match permissions_key {
        Some(key) => {
            claims.insert(key.to_owned(), Value::Object(areas));
        }
        None => claims.extend(areas),
    }
    claims
}

// Lifetime in seconds and the matching `exp`; None when either overflows.
fn expiry(ttl_seconds: u64) -> Option<(i64, DateTime<Utc>)> {
    let ttl = i64::try_from(ttl_seconds).ok()?;
    let exp = Utc::now().checked_add_signed(TimeDelta::try_seconds(ttl)?)?;
    Some((ttl, exp))
}

pub async fn set_cookies(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    let Some(issuer) = state.issuer.as_ref() else {
        tracing::warn!("set-cookies requested but no signing key is configured");
        return Err(AppError::Internal);
    };

    let Some((ttl, exp)) = expiry(state.token_ttl_seconds) else {
        tracing::error!(ttl = state.token_ttl_seconds, "token lifetime out of range");
        return Err(AppError::Internal);
    };

    let claims = demo_claims(state.bearer.permissions_key());
    let token = issuer.encode(&claims, exp)?;

    let key = state.bearer.source().key().to_owned();
    let cookie = Cookie::build((key.clone(), format!("Bearer {token}")))
        .http_only(true)
        .path("/")
        .max_age(time::Duration::seconds(ttl));

    tracing::info!(cookie = %key, "issued demo access token");

    Ok((
        jar.add(cookie),
        Json(json!({"msg": format!("The {key} token is stored as a cookie.")})),
    ))
}
