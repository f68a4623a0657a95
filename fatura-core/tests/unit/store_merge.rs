use crate::fixtures::{pending_document, TEST_DOCUMENT_NO, TEST_SECOND_DOCUMENT_NO};
use fatura_core::domain::{DocumentPatch, DocumentType, Series, ValidationStatus};
use fatura_core::foundation::{DocumentId, RequestId, SeriesCode, SubmissionId};
use fatura_core::infrastructure::storage::{MemoryStore, RecordStore};

#[test]
fn test_upsert_when_new_document_then_inserted() {
    let store = MemoryStore::new();
    let stored = store.upsert_document(pending_document("d-1", TEST_DOCUMENT_NO)).unwrap();
    assert_eq!(stored.id, DocumentId::from("d-1"));
    assert_eq!(store.list_documents().unwrap().len(), 1);
}

#[test]
fn test_upsert_when_same_document_no_and_tax_id_then_merged_not_duplicated() {
    let store = MemoryStore::new();
    store.upsert_document(pending_document("d-1", TEST_DOCUMENT_NO)).unwrap();

    let mut retry = pending_document("d-2", TEST_DOCUMENT_NO);
    retry.submission_id = Some(SubmissionId::from("s-1"));
    let merged = store.upsert_document(retry).unwrap();

    assert_eq!(merged.id, DocumentId::from("d-1"));
    assert_eq!(merged.submission_id, Some(SubmissionId::from("s-1")));
    assert_eq!(store.list_documents().unwrap().len(), 1);
}

#[test]
fn test_upsert_when_different_document_no_then_separate_records() {
    let store = MemoryStore::new();
    store.upsert_document(pending_document("d-1", TEST_DOCUMENT_NO)).unwrap();
    store.upsert_document(pending_document("d-2", TEST_SECOND_DOCUMENT_NO)).unwrap();
    assert_eq!(store.list_documents().unwrap().len(), 2);
}

#[test]
fn test_merge_when_request_id_already_set_then_conflicting_value_ignored() {
    let store = MemoryStore::new();
    let mut first = pending_document("d-1", TEST_DOCUMENT_NO);
    first.request_id = Some(RequestId::from("400001"));
    store.upsert_document(first).unwrap();

    let mut conflicting = pending_document("d-1", TEST_DOCUMENT_NO);
    conflicting.request_id = Some(RequestId::from("400999"));
    let merged = store.upsert_document(conflicting).unwrap();

    assert_eq!(merged.request_id, Some(RequestId::from("400001")));
}

#[test]
fn test_merge_when_upserted_then_created_at_survives_and_updated_at_moves() {
    let store = MemoryStore::new();
    let original = store.upsert_document(pending_document("d-1", TEST_DOCUMENT_NO)).unwrap();
    let merged = store.upsert_document(pending_document("d-2", TEST_DOCUMENT_NO)).unwrap();
    assert_eq!(merged.created_at, original.created_at);
    assert!(merged.updated_at >= original.updated_at);
}

#[test]
fn test_upsert_series_when_stale_sequence_then_counter_not_rewound() {
    let store = MemoryStore::new();
    let mut series = Series::new(SeriesCode::from("A"), 2025, DocumentType::FT, 1);
    for _ in 0..4 {
        series.next_number().unwrap();
    }
    store.upsert_series(series.clone()).unwrap();

    // Re-upserting a copy taken before the advances must keep the counter.
    let stale = Series::new(SeriesCode::from("A"), 2025, DocumentType::FT, 1);
    let stored = store.upsert_series(stale).unwrap();

    assert_eq!(stored.current_sequence, 5);
    assert_eq!(store.list_series().unwrap()[0].current_sequence, 5);
}

#[test]
fn test_patch_when_status_set_then_only_patched_fields_change() {
    let store = MemoryStore::new();
    store.upsert_document(pending_document("d-1", TEST_DOCUMENT_NO)).unwrap();

    let patch = DocumentPatch { validation_status: Some(ValidationStatus::Validated), ..Default::default() };
    let patched = store.patch_document(&DocumentId::from("d-1"), patch).unwrap().unwrap();

    assert_eq!(patched.validation_status, Some(ValidationStatus::Validated));
    assert_eq!(patched.document_nos.len(), 1);
    assert!(patched.submission_id.is_none());
}

#[test]
fn test_patch_when_unknown_id_then_none() {
    let store = MemoryStore::new();
    let patch = DocumentPatch::default();
    assert!(store.patch_document(&DocumentId::from("missing"), patch).unwrap().is_none());
}
