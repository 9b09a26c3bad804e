use axum::{extract::State, Json};
use serde_json::{json, Value};
use tracing::warn;

use crate::state::AppState;

/// GET /health
/// Reports this service's status alongside the upstream service's health.
/// Always 200: an unreachable upstream is reported, not failed on.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let upstream = match state.api.health().await {
        Ok(detail) => json!({ "status": "ok", "detail": detail }),
        Err(e) => {
            warn!("Upstream health check failed: {e}");
            json!({ "status": "unreachable", "error": e.to_string() })
        }
    };

    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "career-compass-web",
        "api_url": state.config.api_url,
        "upstream": upstream,
    }))
}
