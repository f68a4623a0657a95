//! Signed HTTP client for the live Authority service.
//!
//! Each operation builds the common envelope, signs the operation-specific
//! claim set, posts through the structured transport under a deadline, and
//! deserializes the typed result. Submission is fire-and-forget at the
//! protocol level; lifecycle state only ever moves via `get_status`.

use crate::foundation::{now_utc, timestamp_iso8601, Result, SubmissionId, TaxId, SCHEMA_VERSION};
use crate::infrastructure::authority::backend::AuthorityBackend;
use crate::infrastructure::authority::timeout::with_timeout;
use crate::infrastructure::authority::transport::HttpTransport;
use crate::infrastructure::authority::types::*;
use crate::infrastructure::signing::{
    GetStatusClaims, ListDocumentsClaims, ListSeriesClaims, LookupDocumentClaims, RegisterDocumentClaims,
    RequestSeriesClaims, RequestSigner, ValidateDocumentClaims,
};
use async_trait::async_trait;
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct ClientIdentity {
    pub tax_id: TaxId,
    pub software: SoftwareInfo,
}

pub struct HttpAuthorityClient {
    transport: HttpTransport,
    signer: RequestSigner,
    identity: ClientIdentity,
    base_timeout: Duration,
}

impl HttpAuthorityClient {
    pub fn new(transport: HttpTransport, signer: RequestSigner, identity: ClientIdentity, base_timeout: Duration) -> Self {
        Self { transport, signer, identity, base_timeout }
    }

    fn envelope(&self, submission_id: SubmissionId) -> RequestEnvelope {
        RequestEnvelope {
            schema_version: SCHEMA_VERSION.to_string(),
            submission_id,
            tax_id: self.identity.tax_id.clone(),
            submission_timestamp: timestamp_iso8601(now_utc()),
            software_info: self.identity.software.clone(),
        }
    }

    /// Envelope + operation fields + detached signature, as one JSON object.
    fn build_body<P: Serialize, C: Serialize>(&self, operation: &str, envelope: &RequestEnvelope, params: &P, claims: &C) -> Result<Value> {
        let signature = self.signer.sign(claims)?;
        debug!("request signed operation={} submissionID={}", operation, envelope.submission_id);
        let mut body = serde_json::to_value(envelope)?;
        let fields = serde_json::to_value(params)?;
        if let (Some(map), Value::Object(extra)) = (body.as_object_mut(), fields) {
            for (key, value) in extra {
                map.insert(key, value);
            }
            map.insert("signature".to_string(), Value::String(signature));
        }
        Ok(body)
    }

    async fn call<T: DeserializeOwned>(&self, operation: &str, body: Value) -> Result<T> {
        let raw = with_timeout(operation, self.base_timeout, self.transport.post(operation, &body)).await?;
        debug!("authority response received operation={}", operation);
        Ok(serde_json::from_value(raw)?)
    }
}

#[async_trait]
impl AuthorityBackend for HttpAuthorityClient {
    async fn register_document(&self, params: RegisterDocumentParams) -> Result<RegisterDocumentResult> {
        // Reuse the caller-supplied idempotency key on retry; never regenerate.
        let submission_id = params.submission_id.clone().unwrap_or_else(SubmissionId::generate);
        let envelope = self.envelope(submission_id.clone());
        let claims = RegisterDocumentClaims {
            tax_id: self.identity.tax_id.as_str(),
            document_no: params.document_no.as_str(),
            gross_total: params.gross_total,
        };
        let body = self.build_body("RegisterDocument", &envelope, &params, &claims)?;
        info!("registering document document_no={} submission_id={}", params.document_no, submission_id);
        self.call("RegisterDocument", body).await
    }

    async fn request_series(&self, params: RequestSeriesParams) -> Result<SeriesInfo> {
        let envelope = self.envelope(SubmissionId::generate());
        let claims = RequestSeriesClaims {
            tax_id: self.identity.tax_id.as_str(),
            series_code: &params.series_code,
            series_year: params.series_year,
            document_type: &params.document_type.to_string(),
            first_document_number: params.first_document_number,
        };
        let body = self.build_body("RequestSeries", &envelope, &params, &claims)?;
        info!("requesting series code={} year={} type={}", params.series_code, params.series_year, params.document_type);
        self.call("RequestSeries", body).await
    }

    async fn list_series(&self) -> Result<ListSeriesResult> {
        let envelope = self.envelope(SubmissionId::generate());
        let claims = ListSeriesClaims { tax_id: self.identity.tax_id.as_str() };
        let body = self.build_body("ListSeries", &envelope, &serde_json::json!({}), &claims)?;
        self.call("ListSeries", body).await
    }

    async fn get_status(&self, params: GetStatusParams) -> Result<GetStatusResult> {
        let envelope = self.envelope(SubmissionId::generate());
        let claims = GetStatusClaims { tax_id: self.identity.tax_id.as_str(), request_id: params.request_id.as_str() };
        let body = self.build_body("GetStatus", &envelope, &params, &claims)?;
        self.call("GetStatus", body).await
    }

    async fn list_documents(&self, params: ListDocumentsParams) -> Result<ListDocumentsResult> {
        let envelope = self.envelope(SubmissionId::generate());
        let from = params.from_date.map(|d| d.to_string());
        let to = params.to_date.map(|d| d.to_string());
        let claims = ListDocumentsClaims {
            tax_id: self.identity.tax_id.as_str(),
            from_date: from.as_deref(),
            to_date: to.as_deref(),
        };
        let body = self.build_body("ListDocuments", &envelope, &params, &claims)?;
        self.call("ListDocuments", body).await
    }

    async fn lookup_document(&self, params: LookupDocumentParams) -> Result<LookupDocumentResult> {
        let envelope = self.envelope(SubmissionId::generate());
        let claims = LookupDocumentClaims { tax_id: self.identity.tax_id.as_str(), document_no: params.document_no.as_str() };
        let body = self.build_body("LookupDocument", &envelope, &params, &claims)?;
        self.call("LookupDocument", body).await
    }

    async fn validate_document(&self, params: ValidateDocumentParams) -> Result<ValidateDocumentResult> {
        let envelope = self.envelope(params.submission_id.clone());
        let claims = ValidateDocumentClaims {
            tax_id: self.identity.tax_id.as_str(),
            submission_id: params.submission_id.as_str(),
            document_no: params.document_no.as_str(),
            action: params.action.as_flag(),
        };
        let body = self.build_body("ValidateDocument", &envelope, &params, &claims)?;
        info!("validating document document_no={} action={}", params.document_no, params.action.as_flag());
        self.call("ValidateDocument", body).await
    }
}
