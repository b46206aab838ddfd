use axum::response::Json;
use serde_json::{json, Value};

/// GET /actuator/health - liveness probe, always public
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "UP" }))
}

/// GET /actuator/info - build information, always public
pub async fn info() -> Json<Value> {
    Json(json!({
        "app": {
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "description": env!("CARGO_PKG_DESCRIPTION"),
        },
        "timestamp": chrono::Utc::now(),
    }))
}
