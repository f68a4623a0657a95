//! Protocol-accurate in-memory stand-in for the Authority.
//!
//! Reproduces the document and series lifecycle of the live service with the
//! exact response shapes of `types`, so the protocol gateway and external
//! collaborators cannot tell which backend answered. Used whenever no live
//! credential/network is configured.

use crate::domain::{SeriesStatus, ValidationStatus};
use crate::foundation::{now_utc, DocumentNo, GatewayError, RequestId, Result, TaxId};
use crate::infrastructure::authority::backend::AuthorityBackend;
use crate::infrastructure::authority::types::*;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, info};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// The simulated backend's view of one submitted document.
///
/// Registration never decides validation; outcomes are only set by an
/// explicit `ValidateDocument` action. Records live for the process lifetime.
#[derive(Clone, Debug)]
pub struct MockAuthorityRecord {
    pub request_id: RequestId,
    pub request: RegisterDocumentParams,
    pub tax_id: TaxId,
    /// Single-letter validation outcome per document number.
    pub outcomes: HashMap<DocumentNo, char>,
    pub status: String,
    pub registered_at: DateTime<Utc>,
}

struct MockInner {
    records: HashMap<RequestId, MockAuthorityRecord>,
    series: HashMap<String, SeriesInfo>,
    next_request_id: u64,
}

pub struct MockAuthority {
    tax_id: TaxId,
    inner: Mutex<MockInner>,
}

impl MockAuthority {
    pub fn new(tax_id: TaxId) -> Self {
        Self {
            tax_id,
            inner: Mutex::new(MockInner { records: HashMap::new(), series: HashMap::new(), next_request_id: 400_001 }),
        }
    }

    fn lock_inner(&self) -> Result<MutexGuard<'_, MockInner>> {
        self.inner
            .lock()
            .map_err(|_| GatewayError::storage("mock authority lock", "poisoned"))
    }

    fn series_key(params: &RequestSeriesParams) -> String {
        format!("{}/{}/{}", params.series_code, params.series_year, params.document_type)
    }
}

#[async_trait]
impl AuthorityBackend for MockAuthority {
    async fn register_document(&self, params: RegisterDocumentParams) -> Result<RegisterDocumentResult> {
        let mut inner = self.lock_inner()?;
        let submission_id = params.submission_id.clone().unwrap_or_else(crate::foundation::SubmissionId::generate);

        // Same submission id means the same logical registration; hand back
        // the already-assigned requestID instead of minting a duplicate.
        if let Some(existing) = inner
            .records
            .values()
            .find(|record| record.request.submission_id.as_ref() == Some(&submission_id))
        {
            debug!("duplicate registration submission_id={} request_id={}", submission_id, existing.request_id);
            return Ok(RegisterDocumentResult { request_id: existing.request_id.clone(), submission_id });
        }

        let request_id = RequestId::from(inner.next_request_id.to_string());
        inner.next_request_id += 1;

        let mut request = params;
        request.submission_id = Some(submission_id.clone());
        let record = MockAuthorityRecord {
            request_id: request_id.clone(),
            tax_id: self.tax_id.clone(),
            outcomes: HashMap::new(),
            status: "Processed".to_string(),
            registered_at: now_utc(),
            request,
        };
        info!("mock authority registered document document_no={} request_id={}", record.request.document_no, request_id);
        inner.records.insert(request_id.clone(), record);
        Ok(RegisterDocumentResult { request_id, submission_id })
    }

    async fn request_series(&self, params: RequestSeriesParams) -> Result<SeriesInfo> {
        let mut inner = self.lock_inner()?;
        let key = Self::series_key(&params);
        if inner.series.contains_key(&key) {
            return Err(GatewayError::ConflictDuplicateSeries {
                series_code: params.series_code,
                series_year: params.series_year,
                document_type: params.document_type.to_string(),
            });
        }
        let info = SeriesInfo {
            series_code: params.series_code,
            series_year: params.series_year,
            document_type: params.document_type,
            first_document_number: params.first_document_number,
            status: SeriesStatus::Open,
        };
        inner.series.insert(key, info.clone());
        Ok(info)
    }

    async fn list_series(&self) -> Result<ListSeriesResult> {
        let inner = self.lock_inner()?;
        let mut series: Vec<SeriesInfo> = inner.series.values().cloned().collect();
        series.sort_by(|a, b| (a.series_year, &a.series_code).cmp(&(b.series_year, &b.series_code)));
        Ok(ListSeriesResult { series })
    }

    async fn get_status(&self, params: GetStatusParams) -> Result<GetStatusResult> {
        let inner = self.lock_inner()?;
        let record = inner.records.get(&params.request_id).ok_or_else(|| GatewayError::UnprocessableOrPremature {
            operation: "GetStatus".to_string(),
            details: format!("unknown requestID: {}", params.request_id),
        })?;

        let outcome = record.outcomes.get(&record.request.document_no).copied();
        let documents = vec![DocumentOutcome {
            document_no: record.request.document_no.clone(),
            outcome: outcome.map(|c| c.to_string()),
            message: outcome.and_then(|c| ValidationStatus::from_code(c)).map(|s| s.to_string()),
        }];
        Ok(GetStatusResult { request_id: record.request_id.clone(), status: record.status.clone(), documents })
    }

    async fn list_documents(&self, params: ListDocumentsParams) -> Result<ListDocumentsResult> {
        let inner = self.lock_inner()?;
        let mut documents: Vec<DocumentSummary> = inner
            .records
            .values()
            .filter(|record| {
                let date = record.registered_at.date_naive();
                params.from_date.map_or(true, |from| date >= from) && params.to_date.map_or(true, |to| date <= to)
            })
            .map(|record| DocumentSummary {
                document_no: record.request.document_no.clone(),
                request_id: record.request_id.clone(),
                outcome: record.outcomes.get(&record.request.document_no).map(|c| c.to_string()),
                registered_at: record.registered_at,
            })
            .collect();
        documents.sort_by(|a, b| a.request_id.cmp(&b.request_id));
        Ok(ListDocumentsResult { documents })
    }

    async fn lookup_document(&self, params: LookupDocumentParams) -> Result<LookupDocumentResult> {
        let inner = self.lock_inner()?;
        let found = inner.records.values().find(|record| record.request.document_no == params.document_no);
        Ok(match found {
            Some(record) => LookupDocumentResult {
                found: true,
                request_id: Some(record.request_id.clone()),
                outcome: record.outcomes.get(&params.document_no).map(|c| c.to_string()),
            },
            None => LookupDocumentResult { found: false, request_id: None, outcome: None },
        })
    }

    async fn validate_document(&self, params: ValidateDocumentParams) -> Result<ValidateDocumentResult> {
        let mut inner = self.lock_inner()?;
        let record = inner
            .records
            .values_mut()
            .find(|record| record.request.document_no == params.document_no)
            .ok_or_else(|| GatewayError::UnprocessableOrPremature {
                operation: "ValidateDocument".to_string(),
                details: format!("unknown documentNo: {}", params.document_no),
            })?;

        let outcome = match params.action {
            ValidationAction::Confirm => ValidationStatus::Validated.as_code(),
            ValidationAction::Cancel => ValidationStatus::Invalidated.as_code(),
        };
        record.outcomes.insert(params.document_no.clone(), outcome);
        info!("mock authority validated document document_no={} outcome={}", params.document_no, outcome);
        Ok(ValidateDocumentResult { document_no: params.document_no, outcome: outcome.to_string() })
    }
}
