use axum::Json;
use serde_json::{json, Value};

/// Axum handler: GET /health
pub async fn handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
