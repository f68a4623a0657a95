use super::super::state::ApiState;
use super::error_response;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use fatura_core::foundation::DocumentId;
use log::{debug, info};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

pub async fn handle_list_documents(State(state): State<Arc<ApiState>>) -> Response {
    match state.ctx.store.list_documents() {
        Ok(documents) => Json(documents).into_response(),
        Err(err) => error_response(&err),
    }
}

pub async fn handle_get_document(State(state): State<Arc<ApiState>>, Path(id): Path<String>) -> Response {
    let id = DocumentId::from(id);
    match state.ctx.store.get_document(&id) {
        Ok(Some(document)) => Json(document).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "NotFound", "message": format!("document not found: {}", id)})),
        )
            .into_response(),
        Err(err) => error_response(&err),
    }
}

pub async fn handle_list_series(State(state): State<Arc<ApiState>>) -> Response {
    match state.ctx.store.list_series() {
        Ok(series) => Json(series).into_response(),
        Err(err) => error_response(&err),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RefreshQuery {
    #[serde(default)]
    pub mode: Option<String>,
}

pub async fn handle_refresh_document(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    Query(query): Query<RefreshQuery>,
) -> Response {
    let id = DocumentId::from(id);
    let background = matches!(query.mode.as_deref(), Some("background"));
    debug!("refresh requested document_id={} background={}", id, background);

    if background {
        return match state.coordinator.refresh_background(&id) {
            Ok(outcome) => {
                info!("background refresh scheduled document_id={} already_in_progress={}", id, outcome.already_in_progress);
                (
                    StatusCode::ACCEPTED,
                    Json(serde_json::json!({
                        "accepted": !outcome.already_in_progress,
                        "already_in_progress": outcome.already_in_progress,
                    })),
                )
                    .into_response()
            }
            Err(err) => error_response(&err),
        };
    }

    let timeout = Duration::from_millis(state.ctx.config.base_timeout_ms);
    match state.coordinator.refresh_now(&id, timeout).await {
        Ok(outcome) => Json(serde_json::json!({
            "document": outcome.document,
            "sync_error": outcome.sync_error,
            "already_in_progress": outcome.already_in_progress,
        }))
        .into_response(),
        Err(err) => error_response(&err),
    }
}
