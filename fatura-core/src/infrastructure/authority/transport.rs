//! Structured HTTP transport to the Authority.
//!
//! The transport surfaces the HTTP status code explicitly so classification
//! never has to sniff strings out of opaque error messages.

use crate::foundation::{GatewayError, Result};
use log::{debug, warn};
use serde_json::Value;
use std::time::Duration;

/// Maps an explicit HTTP status to the gateway error taxonomy.
pub fn classify_status(operation: &str, status: u16, details: String) -> GatewayError {
    match status {
        429 => GatewayError::RateLimited { operation: operation.to_string(), details },
        401 | 403 => GatewayError::Unauthorized { operation: operation.to_string(), details },
        400 => GatewayError::BadRequest { operation: operation.to_string(), details },
        422 => GatewayError::UnprocessableOrPremature { operation: operation.to_string(), details },
        _ => GatewayError::Unknown { operation: operation.to_string(), details: format!("status={} {}", status, details) },
    }
}

pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, connect_timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(GatewayError::from)?;
        Ok(Self { http, base_url: base_url.into().trim_end_matches('/').to_string() })
    }

    /// Posts one operation request and returns the raw JSON body.
    ///
    /// Non-2xx responses are classified from the status code; the body text
    /// is carried along as detail only.
    pub async fn post(&self, operation: &str, body: &Value) -> Result<Value> {
        let url = format!("{}/{}", self.base_url, operation);
        debug!("posting authority request operation={} url={}", operation, url);

        let response = self.http.post(&url).json(body).send().await.map_err(|err| GatewayError::TransportError {
            operation: operation.to_string(),
            status: err.status().map(|s| s.as_u16()),
            details: err.to_string(),
        })?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        if !status.is_success() {
            warn!("authority request failed operation={} status={}", operation, status.as_u16());
            return Err(classify_status(operation, status.as_u16(), text));
        }

        serde_json::from_str(&text).map_err(|err| GatewayError::SerializationError {
            format: "json".to_string(),
            details: format!("{} response: {}", operation, err),
        })
    }
}
