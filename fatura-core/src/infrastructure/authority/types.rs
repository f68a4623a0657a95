//! Native request/response shapes for the seven Authority operations.
//!
//! Every loosely shaped payload of the legacy protocol is modeled as a typed
//! struct with explicit optional fields, validated at the boundary.

use crate::domain::{DocumentType, SeriesStatus};
use crate::foundation::{DocumentNo, RequestId, SubmissionId, TaxId};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Common fields stamped on every outbound request.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestEnvelope {
    pub schema_version: String,
    pub submission_id: SubmissionId,
    pub tax_id: TaxId,
    pub submission_timestamp: String,
    pub software_info: SoftwareInfo,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SoftwareInfo {
    pub descriptor: String,
    pub signature: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterDocumentParams {
    pub document_no: DocumentNo,
    pub document_type: DocumentType,
    pub net_total: Decimal,
    pub tax_payable: Decimal,
    pub gross_total: Decimal,
    pub currency: String,
    /// Idempotency key. A retried registration must pass the original id;
    /// when absent the client generates a fresh UUID v4.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submission_id: Option<SubmissionId>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterDocumentResult {
    #[serde(rename = "requestID")]
    pub request_id: RequestId,
    pub submission_id: SubmissionId,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestSeriesParams {
    pub series_code: String,
    pub series_year: i32,
    pub document_type: DocumentType,
    pub first_document_number: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesInfo {
    pub series_code: String,
    pub series_year: i32,
    pub document_type: DocumentType,
    pub first_document_number: u64,
    pub status: SeriesStatus,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ListSeriesResult {
    pub series: Vec<SeriesInfo>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GetStatusParams {
    #[serde(rename = "requestID")]
    pub request_id: RequestId,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentOutcome {
    pub document_no: DocumentNo,
    /// Single-letter validation outcome; absent while undecided.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetStatusResult {
    #[serde(rename = "requestID")]
    pub request_id: RequestId,
    pub status: String,
    pub documents: Vec<DocumentOutcome>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDocumentsParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_date: Option<NaiveDate>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    pub document_no: DocumentNo,
    #[serde(rename = "requestID")]
    pub request_id: RequestId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
    pub registered_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ListDocumentsResult {
    pub documents: Vec<DocumentSummary>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupDocumentParams {
    pub document_no: DocumentNo,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupDocumentResult {
    pub found: bool,
    #[serde(rename = "requestID", default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<RequestId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
}

/// The legacy wire flag is `C` for confirm; any other letter cancels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationAction {
    #[serde(rename = "C")]
    Confirm,
    #[serde(rename = "A")]
    Cancel,
}

impl ValidationAction {
    pub fn from_flag(flag: &str) -> Self {
        if flag.trim() == "C" {
            ValidationAction::Confirm
        } else {
            ValidationAction::Cancel
        }
    }

    pub fn as_flag(&self) -> &'static str {
        match self {
            ValidationAction::Confirm => "C",
            ValidationAction::Cancel => "A",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateDocumentParams {
    pub submission_id: SubmissionId,
    /// Tax id of the party requesting validation, when it differs from the
    /// emitter configured on the gateway.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requester_tax_id: Option<TaxId>,
    pub document_no: DocumentNo,
    pub action: ValidationAction,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateDocumentResult {
    pub document_no: DocumentNo,
    pub outcome: String,
}
