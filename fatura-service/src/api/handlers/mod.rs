pub mod documents;
pub mod health;
pub mod soap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use fatura_core::foundation::{ErrorCode, GatewayError};

/// JSON error body: `{"error": <code>, "message": <display>}` with the HTTP
/// status derived from the error code.
pub fn error_response(err: &GatewayError) -> Response {
    let status = match err.code() {
        ErrorCode::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        ErrorCode::Timeout => StatusCode::GATEWAY_TIMEOUT,
        ErrorCode::BadRequest | ErrorCode::ParseError => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::UnprocessableOrPremature => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::ConflictDuplicateSeries | ErrorCode::SeriesClosed | ErrorCode::InvalidStateTransition => {
            StatusCode::CONFLICT
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(serde_json::json!({
            "error": format!("{:?}", err.code()),
            "message": err.to_string(),
        })),
    )
        .into_response()
}
