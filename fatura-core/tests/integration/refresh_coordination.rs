use crate::fixtures::{context_with_backend, invoice_draft, TEST_DOCUMENT_NO, TEST_TAX_ID};
use async_trait::async_trait;
use fatura_core::application::{register_document, SyncCoordinator};
use fatura_core::foundation::{DocumentId, GatewayError, Result, TaxId};
use fatura_core::infrastructure::authority::{
    AuthorityBackend, GetStatusParams, GetStatusResult, ListDocumentsParams, ListDocumentsResult, ListSeriesResult,
    LookupDocumentParams, LookupDocumentResult, MockAuthority, RegisterDocumentParams, RegisterDocumentResult,
    RequestSeriesParams, SeriesInfo, ValidateDocumentParams, ValidateDocumentResult,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Delegates to the simulated Authority, counting `GetStatus` calls and
/// optionally injecting latency or rate-limit failures.
struct InstrumentedBackend {
    inner: MockAuthority,
    status_calls: AtomicUsize,
    status_latency: Duration,
    rate_limit_next: AtomicUsize,
}

impl InstrumentedBackend {
    fn new() -> Self {
        Self {
            inner: MockAuthority::new(TaxId::from(TEST_TAX_ID)),
            status_calls: AtomicUsize::new(0),
            status_latency: Duration::ZERO,
            rate_limit_next: AtomicUsize::new(0),
        }
    }

    fn with_status_latency(latency: Duration) -> Self {
        Self { status_latency: latency, ..Self::new() }
    }

    fn rate_limit_next_calls(&self, calls: usize) {
        self.rate_limit_next.store(calls, Ordering::SeqCst);
    }

    fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthorityBackend for InstrumentedBackend {
    async fn register_document(&self, params: RegisterDocumentParams) -> Result<RegisterDocumentResult> {
        self.inner.register_document(params).await
    }

    async fn request_series(&self, params: RequestSeriesParams) -> Result<SeriesInfo> {
        self.inner.request_series(params).await
    }

    async fn list_series(&self) -> Result<ListSeriesResult> {
        self.inner.list_series().await
    }

    async fn get_status(&self, params: GetStatusParams) -> Result<GetStatusResult> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        if !self.status_latency.is_zero() {
            tokio::time::sleep(self.status_latency).await;
        }
        let remaining = self.rate_limit_next.load(Ordering::SeqCst);
        if remaining > 0 {
            self.rate_limit_next.store(remaining - 1, Ordering::SeqCst);
            return Err(GatewayError::RateLimited {
                operation: "GetStatus".to_string(),
                details: "simulated throttle".to_string(),
            });
        }
        self.inner.get_status(params).await
    }

    async fn list_documents(&self, params: ListDocumentsParams) -> Result<ListDocumentsResult> {
        self.inner.list_documents(params).await
    }

    async fn lookup_document(&self, params: LookupDocumentParams) -> Result<LookupDocumentResult> {
        self.inner.lookup_document(params).await
    }

    async fn validate_document(&self, params: ValidateDocumentParams) -> Result<ValidateDocumentResult> {
        self.inner.validate_document(params).await
    }
}

async fn wait_until_idle(coordinator: &SyncCoordinator, id: &DocumentId) {
    for _ in 0..100 {
        if !coordinator.in_flight(id) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("background refresh never completed for {}", id);
}

#[tokio::test]
async fn test_refresh_background_when_concurrent_then_single_remote_call() {
    let backend = Arc::new(InstrumentedBackend::with_status_latency(Duration::from_millis(100)));
    let ctx = context_with_backend(backend.clone());
    let document = register_document(&ctx, invoice_draft(TEST_DOCUMENT_NO)).await.unwrap();

    let coordinator = SyncCoordinator::new(ctx);
    let mut duplicates = 0;
    for _ in 0..8 {
        let outcome = coordinator.refresh_background(&document.id).unwrap();
        if outcome.already_in_progress {
            duplicates += 1;
        }
    }
    assert_eq!(duplicates, 7);

    wait_until_idle(&coordinator, &document.id).await;
    assert_eq!(backend.status_calls(), 1);
}

#[tokio::test]
async fn test_refresh_now_when_background_job_running_then_no_second_remote_call() {
    let backend = Arc::new(InstrumentedBackend::with_status_latency(Duration::from_millis(300)));
    let ctx = context_with_backend(backend.clone());
    let document = register_document(&ctx, invoice_draft(TEST_DOCUMENT_NO)).await.unwrap();

    let coordinator = SyncCoordinator::new(ctx);
    coordinator.refresh_background(&document.id).unwrap();

    // A sync refresh landing while the background job holds the slot must
    // answer from cache instead of issuing its own remote lookup.
    let outcome = coordinator.refresh_now(&document.id, Duration::from_secs(5)).await.unwrap();
    assert!(outcome.already_in_progress);
    assert!(outcome.document.is_some());

    wait_until_idle(&coordinator, &document.id).await;
    assert_eq!(backend.status_calls(), 1);
}

#[tokio::test]
async fn test_refresh_now_when_called_concurrently_then_single_remote_call() {
    let backend = Arc::new(InstrumentedBackend::with_status_latency(Duration::from_millis(100)));
    let ctx = context_with_backend(backend.clone());
    let document = register_document(&ctx, invoice_draft(TEST_DOCUMENT_NO)).await.unwrap();

    let coordinator = SyncCoordinator::new(ctx);
    let (first, second) = tokio::join!(
        coordinator.refresh_now(&document.id, Duration::from_secs(5)),
        coordinator.refresh_now(&document.id, Duration::from_secs(5)),
    );
    let first = first.unwrap();
    let second = second.unwrap();

    assert_eq!(backend.status_calls(), 1);
    // Exactly one of the two performed the lookup; the loser saw the cache.
    assert_ne!(first.already_in_progress, second.already_in_progress);
}

#[tokio::test]
async fn test_refresh_now_when_rate_limited_then_cached_document_not_error() {
    let backend = Arc::new(InstrumentedBackend::new());
    let ctx = context_with_backend(backend.clone());
    let document = register_document(&ctx, invoice_draft(TEST_DOCUMENT_NO)).await.unwrap();

    backend.rate_limit_next_calls(1);
    let coordinator = SyncCoordinator::new(ctx.clone());
    let outcome = coordinator.refresh_now(&document.id, Duration::from_secs(5)).await.unwrap();

    assert!(outcome.document.is_some());
    let message = outcome.sync_error.expect("degraded refresh carries the remote error");
    assert!(message.contains("rate"));
    assert_eq!(coordinator.last_error(&document.id), Some(message));

    // Cached state is untouched by the failed refresh.
    let stored = ctx.store.get_document(&document.id).unwrap().unwrap();
    assert!(stored.last_sync_at.is_none());
}

#[tokio::test]
async fn test_refresh_now_when_retried_after_failure_then_error_cleared() {
    let backend = Arc::new(InstrumentedBackend::new());
    let ctx = context_with_backend(backend.clone());
    let document = register_document(&ctx, invoice_draft(TEST_DOCUMENT_NO)).await.unwrap();

    let coordinator = SyncCoordinator::new(ctx);
    backend.rate_limit_next_calls(1);
    coordinator.refresh_now(&document.id, Duration::from_secs(5)).await.unwrap();
    assert!(coordinator.last_error(&document.id).is_some());

    let outcome = coordinator.refresh_now(&document.id, Duration::from_secs(5)).await.unwrap();
    assert!(outcome.sync_error.is_none());
    assert!(coordinator.last_error(&document.id).is_none());
    assert!(outcome.document.unwrap().last_sync_at.is_some());
}

#[tokio::test]
async fn test_refresh_now_when_not_registered_then_no_remote_call() {
    let backend = Arc::new(InstrumentedBackend::new());
    let ctx = context_with_backend(backend.clone());
    let stored = ctx.store.upsert_document(crate::fixtures::pending_document("d-1", TEST_DOCUMENT_NO)).unwrap();

    let coordinator = SyncCoordinator::new(ctx);
    let outcome = coordinator.refresh_now(&stored.id, Duration::from_secs(5)).await.unwrap();

    assert!(outcome.sync_error.unwrap().contains("requestID"));
    assert_eq!(backend.status_calls(), 0);
}

#[tokio::test]
async fn test_refresh_now_when_unknown_document_then_not_found() {
    let backend = Arc::new(InstrumentedBackend::new());
    let coordinator = SyncCoordinator::new(context_with_backend(backend));
    let err = coordinator.refresh_now(&DocumentId::from("missing"), Duration::from_secs(5)).await.unwrap_err();
    assert!(matches!(err, GatewayError::NotFound(_)));
}
