use super::super::state::ApiState;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use log::{debug, trace};
use std::sync::Arc;

pub async fn handle_health(State(state): State<Arc<ApiState>>) -> impl IntoResponse {
    let storage_ok = state.ctx.store.health_check().is_ok();
    let status = if storage_ok { "healthy" } else { "degraded" };
    if storage_ok {
        trace!("health check: ok");
    } else {
        debug!("health check: degraded storage_ok={}", storage_ok);
    }
    Json(serde_json::json!({
        "status": status,
        "storage_ok": storage_ok,
        "mode": state.ctx.config.mode.to_string(),
    }))
}
