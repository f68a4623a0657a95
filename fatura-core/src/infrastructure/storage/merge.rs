//! Shared merge rules for the snapshot stores.
//!
//! Last-write-wins per field, not per record: optional fields overwrite only
//! when present, so callers pass identity fields plus what they intend to
//! change.

use crate::domain::{Document, DocumentPatch};
use crate::foundation::now_utc;
use log::warn;

/// Index of the stored record `incoming` should merge into, if any.
pub fn find_document_match(documents: &[Document], incoming: &Document) -> Option<usize> {
    documents.iter().position(|existing| existing.matches(incoming))
}

/// Shallow-merges `incoming` over `existing` in place.
pub fn merge_document(existing: &mut Document, incoming: Document) {
    match (&existing.request_id, incoming.request_id) {
        (None, Some(request_id)) => existing.request_id = Some(request_id),
        (Some(current), Some(request_id)) if *current != request_id => {
            // A requestID is immutable once assigned; keep the original.
            warn!("ignoring conflicting requestID for id={} current={} incoming={}", existing.id, current, request_id);
        }
        _ => {}
    }

    for document_no in incoming.document_nos {
        if !existing.document_nos.contains(&document_no) {
            existing.document_nos.push(document_no);
        }
    }

    if !incoming.lines.is_empty() {
        existing.lines = incoming.lines;
        existing.totals = incoming.totals;
    }
    if let Some(status) = incoming.validation_status {
        existing.validation_status = Some(status);
    }
    if !incoming.validation_messages.is_empty() {
        existing.validation_messages = incoming.validation_messages;
    }
    if let Some(submission_id) = incoming.submission_id {
        existing.submission_id = Some(submission_id);
    }
    if let Some(last_sync_at) = incoming.last_sync_at {
        existing.last_sync_at = Some(last_sync_at);
    }
    if let Some(digest) = incoming.last_payload_digest {
        existing.last_payload_digest = Some(digest);
    }

    // created_at of the original record survives every merge.
    existing.updated_at = now_utc();
}

pub fn apply_patch(existing: &mut Document, patch: DocumentPatch) {
    match (&existing.request_id, patch.request_id) {
        (None, Some(request_id)) => existing.request_id = Some(request_id),
        (Some(current), Some(request_id)) if *current != request_id => {
            warn!("ignoring conflicting requestID patch for id={} current={}", existing.id, current);
        }
        _ => {}
    }
    if let Some(status) = patch.validation_status {
        existing.validation_status = Some(status);
    }
    if let Some(messages) = patch.validation_messages {
        existing.validation_messages = messages;
    }
    if let Some(submission_id) = patch.submission_id {
        existing.submission_id = Some(submission_id);
    }
    if let Some(last_sync_at) = patch.last_sync_at {
        existing.last_sync_at = Some(last_sync_at);
    }
    if let Some(digest) = patch.last_payload_digest {
        existing.last_payload_digest = Some(digest);
    }
    existing.updated_at = now_utc();
}
