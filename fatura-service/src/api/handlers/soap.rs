use super::super::state::ApiState;
use crate::soap::{dispatch, parse_request, render_fault, render_response};
use axum::extract::State;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use fatura_core::foundation::{ErrorCode, GatewayError};
use log::{debug, info, warn};
use std::sync::Arc;

const CONTENT_TYPE_XML: &str = "text/xml; charset=utf-8";

fn xml_response(status: StatusCode, body: String) -> Response {
    let mut response = (status, body).into_response();
    response.headers_mut().insert(header::CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_XML));
    response
}

/// Caller mistakes fault as `Client`, everything downstream as `Server`.
fn fault_code(err: &GatewayError) -> &'static str {
    match err.code() {
        ErrorCode::ParseError | ErrorCode::BadRequest | ErrorCode::NotFound | ErrorCode::ConflictDuplicateSeries => {
            "Client"
        }
        _ => "Server",
    }
}

pub async fn handle_soap(State(state): State<Arc<ApiState>>, body: String) -> Response {
    let parsed = match parse_request(&body) {
        Ok(parsed) => parsed,
        Err(err) => {
            debug!("soap parse failed error={}", err);
            return xml_response(StatusCode::INTERNAL_SERVER_ERROR, render_fault("Client", &err.to_string()));
        }
    };

    info!("soap request operation={}", parsed.operation);
    match dispatch(state.ctx.backend.as_ref(), &parsed.operation, &parsed.fields).await {
        Ok(fields) => match render_response(&parsed.operation, &fields) {
            Ok(xml) => xml_response(StatusCode::OK, xml),
            Err(err) => {
                warn!("soap render failed operation={} error={}", parsed.operation, err);
                xml_response(StatusCode::INTERNAL_SERVER_ERROR, render_fault("Server", &err.to_string()))
            }
        },
        Err(err) => {
            warn!("soap dispatch failed operation={} error={}", parsed.operation, err);
            xml_response(StatusCode::INTERNAL_SERVER_ERROR, render_fault(fault_code(&err), &err.to_string()))
        }
    }
}
