//! Detached request signatures.
//!
//! Every Authority operation carries a compact JWS (RS256) over a fixed,
//! operation-specific claim set. The field sets below are part of the wire
//! contract; they must not gain or lose fields without a schema bump.

use crate::foundation::{GatewayError, Result};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use rust_decimal::Decimal;
use serde::Serialize;

pub struct RequestSigner {
    key: EncodingKey,
    header: Header,
}

impl RequestSigner {
    /// Accepts PKCS#1 or PKCS#8 PEM-encoded RSA private keys.
    pub fn from_rsa_pem(pem: &[u8]) -> Result<Self> {
        let key = EncodingKey::from_rsa_pem(pem)
            .map_err(|err| GatewayError::signing_failed("load-key", err.to_string()))?;
        Ok(Self { key, header: Header::new(Algorithm::RS256) })
    }

    /// `base64url(header) . base64url(claims) . base64url(rsa-sha256 signature)`.
    pub fn sign<T: Serialize>(&self, claims: &T) -> Result<String> {
        jsonwebtoken::encode(&self.header, claims, &self.key)
            .map_err(|err| GatewayError::signing_failed("sign", err.to_string()))
    }
}

#[derive(Debug, Serialize)]
pub struct RegisterDocumentClaims<'a> {
    #[serde(rename = "taxId")]
    pub tax_id: &'a str,
    #[serde(rename = "documentNo")]
    pub document_no: &'a str,
    #[serde(rename = "grossTotal")]
    pub gross_total: Decimal,
}

#[derive(Debug, Serialize)]
pub struct RequestSeriesClaims<'a> {
    #[serde(rename = "taxId")]
    pub tax_id: &'a str,
    #[serde(rename = "seriesCode")]
    pub series_code: &'a str,
    #[serde(rename = "seriesYear")]
    pub series_year: i32,
    #[serde(rename = "documentType")]
    pub document_type: &'a str,
    #[serde(rename = "firstDocumentNumber")]
    pub first_document_number: u64,
}

#[derive(Debug, Serialize)]
pub struct ListSeriesClaims<'a> {
    #[serde(rename = "taxId")]
    pub tax_id: &'a str,
}

#[derive(Debug, Serialize)]
pub struct GetStatusClaims<'a> {
    #[serde(rename = "taxId")]
    pub tax_id: &'a str,
    #[serde(rename = "requestID")]
    pub request_id: &'a str,
}

#[derive(Debug, Serialize)]
pub struct ListDocumentsClaims<'a> {
    #[serde(rename = "taxId")]
    pub tax_id: &'a str,
    #[serde(rename = "fromDate", skip_serializing_if = "Option::is_none")]
    pub from_date: Option<&'a str>,
    #[serde(rename = "toDate", skip_serializing_if = "Option::is_none")]
    pub to_date: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct LookupDocumentClaims<'a> {
    #[serde(rename = "taxId")]
    pub tax_id: &'a str,
    #[serde(rename = "documentNo")]
    pub document_no: &'a str,
}

#[derive(Debug, Serialize)]
pub struct ValidateDocumentClaims<'a> {
    #[serde(rename = "taxId")]
    pub tax_id: &'a str,
    #[serde(rename = "submissionId")]
    pub submission_id: &'a str,
    #[serde(rename = "documentNo")]
    pub document_no: &'a str,
    pub action: &'a str,
}
