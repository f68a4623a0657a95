use crate::domain::{Document, DocumentPatch, Series, SeriesKey};
use crate::foundation::{DocumentId, Result};

/// Append/merge persistence for documents and series.
///
/// Records are never deleted. Implementations must serialize mutation behind
/// a single writer: the snapshot read-merge-write cycle is a lost-update race
/// under two fully concurrent writers otherwise.
pub trait RecordStore: Send + Sync {
    fn get_document(&self, id: &DocumentId) -> Result<Option<Document>>;

    /// Merge `incoming` into the matching stored record, or append.
    ///
    /// Match order: `id`, then `request_id`, then `(document_no, tax_id)`;
    /// first match wins. Merge is shallow per field; `created_at` of the
    /// original record survives and `updated_at` is refreshed. Returns the
    /// merged record.
    fn upsert_document(&self, incoming: Document) -> Result<Document>;

    fn patch_document(&self, id: &DocumentId, patch: DocumentPatch) -> Result<Option<Document>>;

    fn list_documents(&self) -> Result<Vec<Document>>;

    /// Whole-collection overwrite, for import-style collaborators.
    fn replace_documents(&self, documents: Vec<Document>) -> Result<()>;

    fn get_series(&self, key: &SeriesKey) -> Result<Option<Series>>;

    fn upsert_series(&self, series: Series) -> Result<Series>;

    fn list_series(&self) -> Result<Vec<Series>>;

    fn health_check(&self) -> Result<()> {
        Ok(())
    }
}
