/*
 * Responsibility
 * - IT endpoints, registered on a router qualified with the IT read rule
 * - deploy additionally requires IT write
 */
use axum::{Json, response::IntoResponse};
use serde_json::json;

use crate::api::v1::extractors::PermissionsExtractor;
use crate::services::access::AccessLevel;

pub async fn inventory(PermissionsExtractor(granted): PermissionsExtractor) -> impl IntoResponse {
    Json(json!({
        "msg": "you have permission to read the IT inventory!",
        "level": granted.level("it"),
        "can_deploy": granted.allows("it", AccessLevel::Write),
    }))
}

pub async fn deploy() -> impl IntoResponse {
    Json(json!({"msg": "you have permission to deploy IT changes!"}))
}
