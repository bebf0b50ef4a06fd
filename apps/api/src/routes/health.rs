use axum::Json;
use serde_json::{json, Value};

/// GET /
/// Liveness check only; does not touch the scoring service.
pub async fn root_handler() -> Json<Value> {
    Json(json!({
        "message": "Resume Matcher API is running."
    }))
}
