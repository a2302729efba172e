/*
 * Responsibility
 * - Finances endpoints; the read/write rules are attached in routes.rs
 */
use axum::{Json, response::IntoResponse};
use serde_json::json;

pub async fn finances_read() -> impl IntoResponse {
    Json(json!({"msg": "you have permission to perform read actions on finances!"}))
}

pub async fn finances_write() -> impl IntoResponse {
    Json(json!({"msg": "you have permission to perform write actions on finances!"}))
}
