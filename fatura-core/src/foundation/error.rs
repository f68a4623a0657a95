use std::io;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    RateLimited,
    Timeout,
    BadRequest,
    Unauthorized,
    UnprocessableOrPremature,
    NotFound,
    ConflictDuplicateSeries,
    SeriesClosed,
    InvalidStateTransition,
    SigningFailed,
    StorageError,
    SerializationError,
    TransportError,
    ConfigError,
    ParseError,
    Unknown,
    Message,
}

#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("authority rate limit hit during {operation}: {details}")]
    RateLimited { operation: String, details: String },

    #[error("remote call timed out during {operation} after {timeout_ms}ms")]
    Timeout { operation: String, timeout_ms: u64 },

    #[error("authority rejected request during {operation}: {details}")]
    BadRequest { operation: String, details: String },

    #[error("authority refused credentials during {operation}: {details}")]
    Unauthorized { operation: String, details: String },

    #[error("request unprocessable or status requested too soon during {operation}: {details}")]
    UnprocessableOrPremature { operation: String, details: String },

    #[error("document not found: {0}")]
    NotFound(String),

    #[error("series already registered: code={series_code} year={series_year} type={document_type}")]
    ConflictDuplicateSeries { series_code: String, series_year: i32, document_type: String },

    #[error("series closed: code={series_code} year={series_year}")]
    SeriesClosed { series_code: String, series_year: i32 },

    #[error("invalid status transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("signing failed during {operation}: {details}")]
    SigningFailed { operation: String, details: String },

    #[error("storage error during {operation}: {details}")]
    StorageError { operation: String, details: String },

    #[error("{format} serialization error: {details}")]
    SerializationError { format: String, details: String },

    #[error("transport error during {operation}: status={status:?} {details}")]
    TransportError { operation: String, status: Option<u16>, details: String },

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("parse error: {0}")]
    ParseError(String),

    #[error("unclassified authority failure during {operation}: {details}")]
    Unknown { operation: String, details: String },

    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, GatewayError>;

impl GatewayError {
    pub fn code(&self) -> ErrorCode {
        match self {
            GatewayError::RateLimited { .. } => ErrorCode::RateLimited,
            GatewayError::Timeout { .. } => ErrorCode::Timeout,
            GatewayError::BadRequest { .. } => ErrorCode::BadRequest,
            GatewayError::Unauthorized { .. } => ErrorCode::Unauthorized,
            GatewayError::UnprocessableOrPremature { .. } => ErrorCode::UnprocessableOrPremature,
            GatewayError::NotFound(_) => ErrorCode::NotFound,
            GatewayError::ConflictDuplicateSeries { .. } => ErrorCode::ConflictDuplicateSeries,
            GatewayError::SeriesClosed { .. } => ErrorCode::SeriesClosed,
            GatewayError::InvalidStateTransition { .. } => ErrorCode::InvalidStateTransition,
            GatewayError::SigningFailed { .. } => ErrorCode::SigningFailed,
            GatewayError::StorageError { .. } => ErrorCode::StorageError,
            GatewayError::SerializationError { .. } => ErrorCode::SerializationError,
            GatewayError::TransportError { .. } => ErrorCode::TransportError,
            GatewayError::ConfigError(_) => ErrorCode::ConfigError,
            GatewayError::ParseError(_) => ErrorCode::ParseError,
            GatewayError::Unknown { .. } => ErrorCode::Unknown,
            GatewayError::Message(_) => ErrorCode::Message,
        }
    }

    pub fn context(&self) -> ErrorContext {
        ErrorContext { code: self.code(), message: self.to_string() }
    }

    /// True for failures originating at the remote Authority boundary.
    ///
    /// The sync coordinator degrades these to cached state instead of
    /// surfacing them to interactive callers.
    pub fn is_remote(&self) -> bool {
        matches!(
            self.code(),
            ErrorCode::RateLimited
                | ErrorCode::Timeout
                | ErrorCode::BadRequest
                | ErrorCode::Unauthorized
                | ErrorCode::UnprocessableOrPremature
                | ErrorCode::TransportError
                | ErrorCode::Unknown
        )
    }

    pub fn signing_failed(operation: impl Into<String>, details: impl Into<String>) -> Self {
        GatewayError::SigningFailed { operation: operation.into(), details: details.into() }
    }

    pub fn storage(operation: impl Into<String>, details: impl Into<String>) -> Self {
        GatewayError::StorageError { operation: operation.into(), details: details.into() }
    }
}

impl From<io::Error> for GatewayError {
    fn from(err: io::Error) -> Self {
        GatewayError::StorageError { operation: "io".to_string(), details: err.to_string() }
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::SerializationError { format: "json".to_string(), details: err.to_string() }
    }
}

impl From<toml::de::Error> for GatewayError {
    fn from(err: toml::de::Error) -> Self {
        GatewayError::ConfigError(format!("TOML parsing error: {}", err))
    }
}

impl From<jsonwebtoken::errors::Error> for GatewayError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        GatewayError::SigningFailed { operation: "jws".to_string(), details: err.to_string() }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::TransportError {
            operation: "http".to_string(),
            status: err.status().map(|s| s.as_u16()),
            details: err.to_string(),
        }
    }
}

// NOTE: Avoid adding generic "stringly" error conversions here.
// Use structured `GatewayError` variants at the call site to preserve context.
