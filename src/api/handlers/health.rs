/*
 * Responsibility
 * - GET /status (疎通用, 認証なし)
 */
use axum::Json;
use serde_json::{Value, json};

pub async fn status() -> Json<Value> {
    Json(json!({"healthy": true}))
}
