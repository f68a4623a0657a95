use crate::domain::{Document, DocumentPatch, Series, SeriesKey};
use crate::foundation::{DocumentId, GatewayError, Result};
use crate::infrastructure::storage::merge::{apply_patch, find_document_match, merge_document};
use crate::infrastructure::storage::traits::RecordStore;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

struct MemoryInner {
    documents: Vec<Document>,
    series: HashMap<SeriesKey, Series>,
}

/// In-memory store for tests and ephemeral deployments. The single mutex is
/// the writer serialization the snapshot merge cycle requires.
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self { inner: Arc::new(Mutex::new(MemoryInner { documents: Vec::new(), series: HashMap::new() })) }
    }

    fn lock_inner(&self) -> Result<MutexGuard<'_, MemoryInner>> {
        self.inner.lock().map_err(|_| GatewayError::storage("memory store lock", "poisoned"))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for MemoryStore {
    fn get_document(&self, id: &DocumentId) -> Result<Option<Document>> {
        Ok(self.lock_inner()?.documents.iter().find(|doc| &doc.id == id).cloned())
    }

    fn upsert_document(&self, incoming: Document) -> Result<Document> {
        let mut inner = self.lock_inner()?;
        match find_document_match(&inner.documents, &incoming) {
            Some(index) => {
                merge_document(&mut inner.documents[index], incoming);
                Ok(inner.documents[index].clone())
            }
            None => {
                inner.documents.push(incoming.clone());
                Ok(incoming)
            }
        }
    }

    fn patch_document(&self, id: &DocumentId, patch: DocumentPatch) -> Result<Option<Document>> {
        let mut inner = self.lock_inner()?;
        match inner.documents.iter_mut().find(|doc| &doc.id == id) {
            Some(existing) => {
                apply_patch(existing, patch);
                Ok(Some(existing.clone()))
            }
            None => Ok(None),
        }
    }

    fn list_documents(&self) -> Result<Vec<Document>> {
        Ok(self.lock_inner()?.documents.clone())
    }

    fn replace_documents(&self, documents: Vec<Document>) -> Result<()> {
        self.lock_inner()?.documents = documents;
        Ok(())
    }

    fn get_series(&self, key: &SeriesKey) -> Result<Option<Series>> {
        Ok(self.lock_inner()?.series.get(key).cloned())
    }

    fn upsert_series(&self, mut series: Series) -> Result<Series> {
        let mut inner = self.lock_inner()?;
        if let Some(existing) = inner.series.get(&series.key()) {
            // A stale write never rewinds the local numbering counter.
            series.current_sequence = series.current_sequence.max(existing.current_sequence);
        }
        inner.series.insert(series.key(), series.clone());
        Ok(series)
    }

    fn list_series(&self) -> Result<Vec<Series>> {
        let inner = self.lock_inner()?;
        let mut series: Vec<Series> = inner.series.values().cloned().collect();
        series.sort_by(|a, b| (a.series_year, a.series_code.clone()).cmp(&(b.series_year, b.series_code.clone())));
        Ok(series)
    }
}
