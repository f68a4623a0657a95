use crate::fixtures::{TEST_DOCUMENT_NO, TEST_SECOND_DOCUMENT_NO, TEST_TAX_ID};
use chrono::NaiveDate;
use fatura_core::domain::DocumentType;
use fatura_core::foundation::{DocumentNo, SubmissionId, TaxId};
use fatura_core::infrastructure::authority::{
    AuthorityBackend, GetStatusParams, ListDocumentsParams, LookupDocumentParams, MockAuthority,
    RegisterDocumentParams, ValidateDocumentParams, ValidationAction,
};
use rust_decimal::Decimal;

fn mock() -> MockAuthority {
    MockAuthority::new(TaxId::from(TEST_TAX_ID))
}

fn register_params(document_no: &str) -> RegisterDocumentParams {
    RegisterDocumentParams {
        document_no: DocumentNo::from(document_no),
        document_type: DocumentType::FT,
        net_total: Decimal::from(100),
        tax_payable: Decimal::from(14),
        gross_total: Decimal::from(114),
        currency: "AOA".to_string(),
        submission_id: Some(SubmissionId::from("s-1")),
    }
}

#[tokio::test]
async fn test_lifecycle_when_confirmed_then_status_reports_validated() {
    let mock = mock();
    let registered = mock.register_document(register_params(TEST_DOCUMENT_NO)).await.unwrap();

    let validated = mock
        .validate_document(ValidateDocumentParams {
            submission_id: SubmissionId::from("s-1"),
            requester_tax_id: None,
            document_no: DocumentNo::from(TEST_DOCUMENT_NO),
            action: ValidationAction::Confirm,
        })
        .await
        .unwrap();
    assert_eq!(validated.outcome, "V");

    let status = mock.get_status(GetStatusParams { request_id: registered.request_id }).await.unwrap();
    assert_eq!(status.documents[0].outcome.as_deref(), Some("V"));
}

#[tokio::test]
async fn test_lifecycle_when_cancelled_then_status_reports_invalidated() {
    let mock = mock();
    let registered = mock.register_document(register_params(TEST_DOCUMENT_NO)).await.unwrap();

    mock.validate_document(ValidateDocumentParams {
        submission_id: SubmissionId::from("s-1"),
        requester_tax_id: None,
        document_no: DocumentNo::from(TEST_DOCUMENT_NO),
        action: ValidationAction::Cancel,
    })
    .await
    .unwrap();

    let status = mock.get_status(GetStatusParams { request_id: registered.request_id }).await.unwrap();
    assert_eq!(status.documents[0].outcome.as_deref(), Some("I"));
}

#[tokio::test]
async fn test_lookup_when_registered_then_found_with_request_id() {
    let mock = mock();
    let registered = mock.register_document(register_params(TEST_DOCUMENT_NO)).await.unwrap();

    let found = mock.lookup_document(LookupDocumentParams { document_no: DocumentNo::from(TEST_DOCUMENT_NO) }).await.unwrap();
    assert!(found.found);
    assert_eq!(found.request_id, Some(registered.request_id));
    assert_eq!(found.outcome, None);
}

#[tokio::test]
async fn test_lookup_when_unknown_then_not_found_without_error() {
    let mock = mock();
    let missing = mock.lookup_document(LookupDocumentParams { document_no: DocumentNo::from("FT 2025/99999") }).await.unwrap();
    assert!(!missing.found);
    assert_eq!(missing.request_id, None);
}

#[tokio::test]
async fn test_list_documents_when_date_window_excludes_then_empty() {
    let mock = mock();
    mock.register_document(register_params(TEST_DOCUMENT_NO)).await.unwrap();

    let mut second = register_params(TEST_SECOND_DOCUMENT_NO);
    second.submission_id = Some(SubmissionId::from("s-2"));
    mock.register_document(second).await.unwrap();

    let all = mock.list_documents(ListDocumentsParams::default()).await.unwrap();
    assert_eq!(all.documents.len(), 2);

    let past = ListDocumentsParams {
        from_date: NaiveDate::from_ymd_opt(2000, 1, 1),
        to_date: NaiveDate::from_ymd_opt(2000, 12, 31),
    };
    let windowed = mock.list_documents(past).await.unwrap();
    assert!(windowed.documents.is_empty());
}
