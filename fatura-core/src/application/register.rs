//! Registration and series acquisition against the configured backend.
//!
//! Unlike status refresh, registration is load-bearing: failures propagate.
//! The submission id is persisted before the remote call so a retry after a
//! timeout reuses the same idempotency key — the Authority may have processed
//! the original call even though we discarded its result.

use crate::application::GatewayContext;
use crate::domain::{Document, DocumentLine, DocumentPatch, DocumentType, Series, SeriesStatus};
use crate::foundation::{now_utc, DocumentId, DocumentNo, Result, SubmissionId, TaxId};
use crate::infrastructure::authority::timeout::with_timeout;
use crate::infrastructure::authority::types::{RegisterDocumentParams, RequestSeriesParams};
use log::{info, warn};
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct DocumentDraft {
    pub document_no: DocumentNo,
    pub document_type: DocumentType,
    pub lines: Vec<DocumentLine>,
    pub currency: String,
}

/// Records the document locally as Pending and registers it remotely.
///
/// Re-running for the same document number reuses the stored record and its
/// submission id, so the call is safe to retry.
pub async fn register_document(ctx: &GatewayContext, draft: DocumentDraft) -> Result<Document> {
    let tax_id = TaxId::from(ctx.config.tax_id.as_str());
    let mut document = Document::new(DocumentId::generate(), tax_id, draft.document_no, draft.lines, &draft.currency);
    document.document_type = draft.document_type;
    // Upsert first: a retry merges into the existing record instead of
    // appending a duplicate.
    let mut document = ctx.store.upsert_document(document)?;

    if let Some(request_id) = &document.request_id {
        info!("document already registered id={} request_id={}", document.id, request_id);
        return Ok(document);
    }

    let submission_id = match &document.submission_id {
        Some(existing) => existing.clone(),
        None => {
            let generated = SubmissionId::generate();
            let patch = DocumentPatch { submission_id: Some(generated.clone()), ..Default::default() };
            document = ctx
                .store
                .patch_document(&document.id, patch)?
                .unwrap_or(document);
            generated
        }
    };

    let params = RegisterDocumentParams {
        document_no: document.document_nos[0].clone(),
        document_type: document.document_type,
        net_total: document.totals.net,
        tax_payable: document.totals.tax_payable,
        gross_total: document.totals.gross,
        currency: document.totals.currency.clone(),
        submission_id: Some(submission_id),
    };

    let timeout = Duration::from_millis(ctx.config.base_timeout_ms);
    let result = with_timeout("RegisterDocument", timeout, ctx.backend.register_document(params)).await?;

    info!("document registered id={} request_id={}", document.id, result.request_id);
    let patch = DocumentPatch {
        request_id: Some(result.request_id),
        submission_id: Some(result.submission_id),
        ..Default::default()
    };
    ctx.store
        .patch_document(&document.id, patch)?
        .ok_or_else(|| crate::foundation::GatewayError::NotFound(document.id.to_string()))
}

/// Requests a numbering series remotely and records the grant.
///
/// On a remote failure other than a duplicate conflict, the series is
/// provisionally recorded as pending so local numbering can proceed and the
/// grant can be retried later.
pub async fn request_series(ctx: &GatewayContext, params: RequestSeriesParams) -> Result<Series> {
    let timeout = Duration::from_millis(ctx.config.base_timeout_ms);
    let attempt = with_timeout("RequestSeries", timeout, ctx.backend.request_series(params.clone())).await;

    match attempt {
        Ok(info) => {
            let mut series = Series::new(
                info.series_code.clone().into(),
                info.series_year,
                info.document_type,
                info.first_document_number,
            );
            series.status = info.status;
            ctx.store.upsert_series(series)
        }
        Err(err) if err.is_remote() => {
            warn!("series grant pending code={} year={} error={}", params.series_code, params.series_year, err);
            let mut series = Series::new(
                params.series_code.clone().into(),
                params.series_year,
                params.document_type,
                params.first_document_number,
            );
            series.status = SeriesStatus::Open;
            series.remote_pending = true;
            series.last_error = Some(err.to_string());
            series.last_attempt_at = Some(now_utc());
            ctx.store.upsert_series(series)
        }
        Err(err) => Err(err),
    }
}
