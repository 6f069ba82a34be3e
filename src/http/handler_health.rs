//! Liveness endpoint.

use axum::Json;
use chrono::Utc;
use serde_json::{Value, json};

/// Handle health check requests
pub async fn handle_healthz() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}
