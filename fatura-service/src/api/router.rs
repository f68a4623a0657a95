use super::handlers::documents::{
    handle_get_document, handle_list_documents, handle_list_series, handle_refresh_document,
};
use super::handlers::health::handle_health;
use super::handlers::soap::handle_soap;
use super::state::ApiState;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use fatura_core::foundation::GatewayError;
use log::{error, info};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

pub async fn run_server(addr: SocketAddr, state: Arc<ApiState>) -> Result<(), GatewayError> {
    info!("binding gateway server addr={}", addr);
    let app = build_router(state);
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server ready and accepting connections addr={}", addr);
    axum::serve(listener, app.into_make_service()).await.map_err(|err| {
        error!("HTTP server terminated unexpectedly addr={} error={}", addr, err);
        GatewayError::Message(err.to_string())
    })
}

pub fn build_router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/soap", post(handle_soap))
        .route("/documents", get(handle_list_documents))
        .route("/documents/:id", get(handle_get_document))
        .route("/documents/:id/refresh", post(handle_refresh_document))
        .route("/series", get(handle_list_series))
        .route("/health", get(handle_health))
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .with_state(state)
}
