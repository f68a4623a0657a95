//! Maps parsed request fields onto backend calls and results back to fields.

use crate::soap::envelope::ResponseField;
use chrono::NaiveDate;
use fatura_core::foundation::{GatewayError, Result, DEFAULT_CURRENCY};
use fatura_core::infrastructure::authority::{
    AuthorityBackend, GetStatusParams, ListDocumentsParams, LookupDocumentParams, RegisterDocumentParams,
    RequestSeriesParams, ValidateDocumentParams, ValidationAction,
};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;

type Fields = HashMap<String, String>;

fn field_err(name: &str, details: impl std::fmt::Display) -> GatewayError {
    GatewayError::ParseError(format!("field {}: {}", name, details))
}

fn required(fields: &Fields, name: &str) -> Result<String> {
    fields
        .get(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| field_err(name, "missing"))
}

fn optional(fields: &Fields, name: &str) -> Option<String> {
    fields.get(name).map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}

fn required_parsed<T: FromStr>(fields: &Fields, name: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    let raw = required(fields, name)?;
    raw.parse::<T>().map_err(|err| field_err(name, err))
}

fn optional_date(fields: &Fields, name: &str) -> Result<Option<NaiveDate>> {
    match optional(fields, name) {
        None => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map(Some).map_err(|err| field_err(name, err)),
    }
}

fn text(name: &str, value: impl ToString) -> ResponseField {
    ResponseField::text(name, value.to_string())
}

/// Routes one parsed request to the backend. Fields use the legacy
/// camelCase spelling throughout (`requestID` included).
pub async fn dispatch(backend: &dyn AuthorityBackend, operation: &str, fields: &Fields) -> Result<Vec<ResponseField>> {
    match operation {
        "RegisterDocument" => register_document(backend, fields).await,
        "RequestSeries" => request_series(backend, fields).await,
        "ListSeries" => list_series(backend).await,
        "GetStatus" => get_status(backend, fields).await,
        "ListDocuments" => list_documents(backend, fields).await,
        "LookupDocument" => lookup_document(backend, fields).await,
        "ValidateDocument" => validate_document(backend, fields).await,
        other => Err(GatewayError::ParseError(format!("unsupported operation: {}", other))),
    }
}

async fn register_document(backend: &dyn AuthorityBackend, fields: &Fields) -> Result<Vec<ResponseField>> {
    let params = RegisterDocumentParams {
        document_no: required(fields, "documentNo")?.into(),
        document_type: required_parsed(fields, "documentType")?,
        net_total: required_parsed::<Decimal>(fields, "netTotal")?,
        tax_payable: required_parsed::<Decimal>(fields, "taxPayable")?,
        gross_total: required_parsed::<Decimal>(fields, "grossTotal")?,
        currency: optional(fields, "currency").unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        submission_id: optional(fields, "submissionId").map(Into::into),
    };
    let result = backend.register_document(params).await?;
    Ok(vec![text("requestID", &result.request_id), text("submissionId", &result.submission_id)])
}

async fn request_series(backend: &dyn AuthorityBackend, fields: &Fields) -> Result<Vec<ResponseField>> {
    let params = RequestSeriesParams {
        series_code: required(fields, "seriesCode")?,
        series_year: required_parsed(fields, "seriesYear")?,
        document_type: required_parsed(fields, "documentType")?,
        first_document_number: required_parsed(fields, "firstDocumentNumber")?,
    };
    let info = backend.request_series(params).await?;
    Ok(vec![
        text("seriesCode", &info.series_code),
        text("seriesYear", info.series_year),
        text("documentType", info.document_type),
        text("firstDocumentNumber", info.first_document_number),
        text("status", format!("{:?}", info.status)),
    ])
}

async fn list_series(backend: &dyn AuthorityBackend) -> Result<Vec<ResponseField>> {
    let result = backend.list_series().await?;
    let mut out = Vec::with_capacity(result.series.len());
    for info in result.series {
        out.push(ResponseField::group(
            "series",
            vec![
                ("seriesCode".to_string(), info.series_code),
                ("seriesYear".to_string(), info.series_year.to_string()),
                ("documentType".to_string(), info.document_type.to_string()),
                ("firstDocumentNumber".to_string(), info.first_document_number.to_string()),
                ("status".to_string(), format!("{:?}", info.status)),
            ],
        ));
    }
    Ok(out)
}

async fn get_status(backend: &dyn AuthorityBackend, fields: &Fields) -> Result<Vec<ResponseField>> {
    let params = GetStatusParams { request_id: required(fields, "requestID")?.into() };
    let result = backend.get_status(params).await?;
    let mut out = vec![text("requestID", &result.request_id), text("status", &result.status)];
    for doc in result.documents {
        let mut group = vec![("documentNo".to_string(), doc.document_no.to_string())];
        if let Some(outcome) = doc.outcome {
            group.push(("outcome".to_string(), outcome));
        }
        if let Some(message) = doc.message {
            group.push(("message".to_string(), message));
        }
        out.push(ResponseField::group("document", group));
    }
    Ok(out)
}

async fn list_documents(backend: &dyn AuthorityBackend, fields: &Fields) -> Result<Vec<ResponseField>> {
    let params = ListDocumentsParams {
        from_date: optional_date(fields, "fromDate")?,
        to_date: optional_date(fields, "toDate")?,
    };
    let result = backend.list_documents(params).await?;
    let mut out = Vec::with_capacity(result.documents.len());
    for doc in result.documents {
        let mut group = vec![
            ("documentNo".to_string(), doc.document_no.to_string()),
            ("requestID".to_string(), doc.request_id.to_string()),
        ];
        if let Some(outcome) = doc.outcome {
            group.push(("outcome".to_string(), outcome));
        }
        group.push(("registeredAt".to_string(), doc.registered_at.to_rfc3339()));
        out.push(ResponseField::group("document", group));
    }
    Ok(out)
}

async fn lookup_document(backend: &dyn AuthorityBackend, fields: &Fields) -> Result<Vec<ResponseField>> {
    let params = LookupDocumentParams { document_no: required(fields, "documentNo")?.into() };
    let result = backend.lookup_document(params).await?;
    let mut out = vec![text("found", result.found)];
    if let Some(request_id) = result.request_id {
        out.push(text("requestID", request_id));
    }
    if let Some(outcome) = result.outcome {
        out.push(text("outcome", outcome));
    }
    Ok(out)
}

async fn validate_document(backend: &dyn AuthorityBackend, fields: &Fields) -> Result<Vec<ResponseField>> {
    let params = ValidateDocumentParams {
        submission_id: required(fields, "submissionId")?.into(),
        requester_tax_id: optional(fields, "requesterTaxId").map(Into::into),
        document_no: required(fields, "documentNo")?.into(),
        action: ValidationAction::from_flag(&required(fields, "action")?),
    };
    let result = backend.validate_document(params).await?;
    Ok(vec![text("documentNo", &result.document_no), text("outcome", &result.outcome)])
}
