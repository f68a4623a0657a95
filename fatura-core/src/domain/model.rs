use crate::domain::status::ValidationStatus;
use crate::foundation::{now_utc, DocumentId, DocumentNo, GatewayError, RequestId, Result, SeriesCode, SubmissionId, TaxId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentType {
    /// Fatura (invoice).
    #[default]
    FT,
    /// Fatura-recibo (invoice-receipt).
    FR,
    /// Nota de crédito (credit note).
    NC,
    /// Nota de débito (debit note).
    ND,
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            DocumentType::FT => "FT",
            DocumentType::FR => "FR",
            DocumentType::NC => "NC",
            DocumentType::ND => "ND",
        };
        write!(f, "{}", tag)
    }
}

impl FromStr for DocumentType {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "FT" => Ok(DocumentType::FT),
            "FR" => Ok(DocumentType::FR),
            "NC" => Ok(DocumentType::NC),
            "ND" => Ok(DocumentType::ND),
            other => Err(GatewayError::ParseError(format!("unknown document type: {}", other))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DocumentLine {
    #[serde(default)]
    pub description: Option<String>,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    /// Tax rate as a percentage (14 means 14%).
    pub tax_rate: Decimal,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub net: Decimal,
    pub tax_payable: Decimal,
    pub gross: Decimal,
    pub currency: String,
}

pub fn compute_totals(lines: &[DocumentLine], currency: &str) -> Totals {
    let mut net = Decimal::ZERO;
    let mut tax = Decimal::ZERO;
    for line in lines {
        let line_net = line.quantity * line.unit_price;
        net += line_net;
        tax += line_net * line.tax_rate / Decimal::from(100);
    }
    Totals { net, tax_payable: tax, gross: net + tax, currency: currency.to_string() }
}

/// A locally tracked invoice and its Authority lifecycle bookkeeping.
///
/// Never deleted; the record store only appends and merges.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    /// Assigned by the Authority on registration. Immutable once set.
    #[serde(default)]
    pub request_id: Option<RequestId>,
    #[serde(default)]
    pub document_nos: Vec<DocumentNo>,
    pub tax_id: TaxId,
    #[serde(default)]
    pub document_type: DocumentType,
    #[serde(default)]
    pub lines: Vec<DocumentLine>,
    #[serde(default)]
    pub totals: Totals,
    #[serde(default)]
    pub validation_status: Option<ValidationStatus>,
    #[serde(default)]
    pub validation_messages: Vec<String>,
    /// Idempotency key used on registration; reused verbatim on retry.
    #[serde(default)]
    pub submission_id: Option<SubmissionId>,
    #[serde(default)]
    pub last_sync_at: Option<DateTime<Utc>>,
    /// Hex SHA-256 of the last remote status payload merged into this record.
    #[serde(default)]
    pub last_payload_digest: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    pub fn new(id: DocumentId, tax_id: TaxId, document_no: DocumentNo, lines: Vec<DocumentLine>, currency: &str) -> Self {
        let now = now_utc();
        let totals = compute_totals(&lines, currency);
        Self {
            id,
            request_id: None,
            document_nos: vec![document_no],
            tax_id,
            document_type: DocumentType::default(),
            lines,
            totals,
            validation_status: Some(ValidationStatus::Pending),
            validation_messages: Vec::new(),
            submission_id: None,
            last_sync_at: None,
            last_payload_digest: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Dedup rule: (`id` OR `request_id`) OR (`document_no` AND emitter tax id).
    /// First match wins.
    pub fn matches(&self, other: &Document) -> bool {
        if self.id == other.id {
            return true;
        }
        if let (Some(a), Some(b)) = (&self.request_id, &other.request_id) {
            if a == b {
                return true;
            }
        }
        self.tax_id == other.tax_id && self.document_nos.iter().any(|no| other.document_nos.contains(no))
    }
}

/// Partial update for `patch_document`. `None` fields are left untouched.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DocumentPatch {
    #[serde(default)]
    pub request_id: Option<RequestId>,
    #[serde(default)]
    pub validation_status: Option<ValidationStatus>,
    #[serde(default)]
    pub validation_messages: Option<Vec<String>>,
    #[serde(default)]
    pub submission_id: Option<SubmissionId>,
    #[serde(default)]
    pub last_sync_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_payload_digest: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeriesKey {
    pub series_code: SeriesCode,
    pub series_year: i32,
    pub document_type: DocumentType,
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.series_code, self.series_year, self.document_type)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeriesStatus {
    #[default]
    Open,
    InUse,
    Closed,
}

/// A numbering series granted by the Authority (or provisionally recorded
/// while the grant is pending). Never deleted.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Series {
    pub series_code: SeriesCode,
    pub series_year: i32,
    pub document_type: DocumentType,
    pub first_document_number: u64,
    pub current_sequence: u64,
    pub status: SeriesStatus,
    /// True while the remote grant has not been confirmed.
    #[serde(default)]
    pub remote_pending: bool,
    #[serde(default)]
    pub last_error: Option<String>,
    #[serde(default)]
    pub last_attempt_at: Option<DateTime<Utc>>,
}

impl Series {
    pub fn new(series_code: SeriesCode, series_year: i32, document_type: DocumentType, first_document_number: u64) -> Self {
        Self {
            series_code,
            series_year,
            document_type,
            first_document_number,
            current_sequence: first_document_number,
            status: SeriesStatus::Open,
            remote_pending: false,
            last_error: None,
            last_attempt_at: None,
        }
    }

    pub fn key(&self) -> SeriesKey {
        SeriesKey { series_code: self.series_code.clone(), series_year: self.series_year, document_type: self.document_type }
    }

    /// Hands out the next sequence number and advances the counter.
    ///
    /// Invariant: `current_sequence >= first_document_number`; a Closed
    /// series accepts no further advances.
    pub fn next_number(&mut self) -> Result<u64> {
        if self.status == SeriesStatus::Closed {
            return Err(GatewayError::SeriesClosed {
                series_code: self.series_code.to_string(),
                series_year: self.series_year,
            });
        }
        let number = self.current_sequence;
        self.current_sequence += 1;
        self.status = SeriesStatus::InUse;
        Ok(number)
    }

    pub fn close(&mut self) {
        self.status = SeriesStatus::Closed;
    }
}
