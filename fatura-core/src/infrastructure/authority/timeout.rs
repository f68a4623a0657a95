use crate::foundation::{GatewayError, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// Races `fut` against a deadline.
///
/// On expiry the in-flight future is dropped, not cancelled remotely: the
/// Authority may still complete the call server-side and its result is
/// discarded. Callers retrying `RegisterDocument` after a timeout must reuse
/// the original submission id.
pub async fn with_timeout<T, F>(operation: &str, timeout: Duration, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => Err(GatewayError::Timeout { operation: operation.to_string(), timeout_ms: timeout.as_millis() as u64 }),
    }
}

/// Retry an async operation with fixed delay.
///
/// The wrapper itself never retries; this helper is for callers that opt in,
/// and they own respecting the Authority's rate limits.
pub async fn retry<F, Fut, T>(mut attempts: usize, delay: Duration, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut last_err = None;
    while attempts > 0 {
        match op().await {
            Ok(v) => return Ok(v),
            Err(err) => {
                last_err = Some(err);
                attempts -= 1;
                if attempts > 0 {
                    sleep(delay).await;
                }
            }
        }
    }
    Err(last_err.unwrap_or_else(|| GatewayError::Message("retry exhausted".to_string())))
}
