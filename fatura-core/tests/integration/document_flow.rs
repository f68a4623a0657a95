use crate::fixtures::{invoice_draft, simulated_context, TEST_DOCUMENT_NO};
use fatura_core::application::{register_document, request_series, SyncCoordinator};
use fatura_core::domain::{DocumentType, SeriesStatus, ValidationStatus};
use fatura_core::foundation::GatewayError;
use fatura_core::infrastructure::authority::{RequestSeriesParams, ValidateDocumentParams, ValidationAction};
use rust_decimal::Decimal;
use std::time::Duration;

fn series_params() -> RequestSeriesParams {
    RequestSeriesParams { series_code: "A".to_string(), series_year: 2025, document_type: DocumentType::FT, first_document_number: 1 }
}

#[tokio::test]
async fn test_register_when_single_line_invoice_then_totals_and_request_id() {
    let ctx = simulated_context();
    let document = register_document(&ctx, invoice_draft(TEST_DOCUMENT_NO)).await.unwrap();

    assert_eq!(document.totals.net, Decimal::from(100));
    assert_eq!(document.totals.tax_payable, Decimal::from(14));
    assert_eq!(document.totals.gross, Decimal::from(114));
    assert!(document.request_id.is_some());
    assert!(document.submission_id.is_some());
    assert_eq!(document.validation_status, Some(ValidationStatus::Pending));
}

#[tokio::test]
async fn test_register_when_retried_then_same_request_id_and_single_record() {
    let ctx = simulated_context();
    let first = register_document(&ctx, invoice_draft(TEST_DOCUMENT_NO)).await.unwrap();
    let second = register_document(&ctx, invoice_draft(TEST_DOCUMENT_NO)).await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(first.request_id, second.request_id);
    assert_eq!(ctx.store.list_documents().unwrap().len(), 1);
}

#[tokio::test]
async fn test_flow_when_confirmed_then_refresh_merges_validated() {
    let ctx = simulated_context();
    let document = register_document(&ctx, invoice_draft(TEST_DOCUMENT_NO)).await.unwrap();

    ctx.backend
        .validate_document(ValidateDocumentParams {
            submission_id: document.submission_id.clone().unwrap(),
            requester_tax_id: None,
            document_no: document.document_nos[0].clone(),
            action: ValidationAction::Confirm,
        })
        .await
        .unwrap();

    let coordinator = SyncCoordinator::new(ctx.clone());
    let outcome = coordinator.refresh_now(&document.id, Duration::from_secs(5)).await.unwrap();

    let refreshed = outcome.document.unwrap();
    assert_eq!(refreshed.validation_status, Some(ValidationStatus::Validated));
    assert!(refreshed.last_sync_at.is_some());
    assert!(refreshed.last_payload_digest.is_some());
}

#[tokio::test]
async fn test_flow_when_cancelled_then_refresh_merges_invalidated() {
    let ctx = simulated_context();
    let document = register_document(&ctx, invoice_draft(TEST_DOCUMENT_NO)).await.unwrap();

    ctx.backend
        .validate_document(ValidateDocumentParams {
            submission_id: document.submission_id.clone().unwrap(),
            requester_tax_id: None,
            document_no: document.document_nos[0].clone(),
            action: ValidationAction::Cancel,
        })
        .await
        .unwrap();

    let coordinator = SyncCoordinator::new(ctx);
    let outcome = coordinator.refresh_now(&document.id, Duration::from_secs(5)).await.unwrap();
    assert_eq!(outcome.document.unwrap().validation_status, Some(ValidationStatus::Invalidated));
}

#[tokio::test]
async fn test_request_series_when_granted_then_recorded_open() {
    let ctx = simulated_context();
    let series = request_series(&ctx, series_params()).await.unwrap();

    assert_eq!(series.status, SeriesStatus::Open);
    assert!(!series.remote_pending);
    assert_eq!(ctx.store.list_series().unwrap().len(), 1);
}

#[tokio::test]
async fn test_request_series_when_duplicate_then_conflict_propagates() {
    let ctx = simulated_context();
    request_series(&ctx, series_params()).await.unwrap();

    let err = request_series(&ctx, series_params()).await.unwrap_err();
    assert!(matches!(err, GatewayError::ConflictDuplicateSeries { .. }));
    assert_eq!(ctx.store.list_series().unwrap().len(), 1);
}
