//! Whole-snapshot JSON persistence.
//!
//! Every mutation reads the full collection, applies the merge and writes the
//! full collection back; there is no partial persistence and no transaction
//! log. All mutation is serialized through one mutex — two fully concurrent
//! read-merge-write cycles would otherwise lose updates.

use crate::domain::{Document, DocumentPatch, Series, SeriesKey};
use crate::foundation::{DocumentId, GatewayError, Result};
use crate::infrastructure::storage::merge::{apply_patch, find_document_match, merge_document};
use crate::infrastructure::storage::traits::RecordStore;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreSnapshot {
    #[serde(default)]
    documents: Vec<Document>,
    #[serde(default)]
    series: Vec<Series>,
}

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let store = Self { path, write_lock: Mutex::new(()) };
        // Fail fast on an unreadable or corrupt snapshot.
        store.read_snapshot()?;
        Ok(store)
    }

    fn lock_writer(&self) -> Result<MutexGuard<'_, ()>> {
        self.write_lock.lock().map_err(|_| GatewayError::storage("store write lock", "poisoned"))
    }

    fn read_snapshot(&self) -> Result<StoreSnapshot> {
        if !self.path.exists() {
            return Ok(StoreSnapshot::default());
        }
        let raw = fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(StoreSnapshot::default());
        }
        serde_json::from_str(&raw).map_err(|err| GatewayError::SerializationError {
            format: "json".to_string(),
            details: format!("snapshot {}: {}", self.path.display(), err),
        })
    }

    /// Write-to-temp then rename, so a crash mid-write never truncates the
    /// previous snapshot.
    fn write_snapshot(&self, snapshot: &StoreSnapshot) -> Result<()> {
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(snapshot)?)?;
        fs::rename(&tmp, &self.path)?;
        debug!(
            "snapshot written path={} documents={} series={}",
            self.path.display(),
            snapshot.documents.len(),
            snapshot.series.len()
        );
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordStore for JsonFileStore {
    fn get_document(&self, id: &DocumentId) -> Result<Option<Document>> {
        Ok(self.read_snapshot()?.documents.into_iter().find(|doc| &doc.id == id))
    }

    fn upsert_document(&self, incoming: Document) -> Result<Document> {
        let _guard = self.lock_writer()?;
        let mut snapshot = self.read_snapshot()?;
        let merged = match find_document_match(&snapshot.documents, &incoming) {
            Some(index) => {
                merge_document(&mut snapshot.documents[index], incoming);
                snapshot.documents[index].clone()
            }
            None => {
                snapshot.documents.push(incoming.clone());
                incoming
            }
        };
        self.write_snapshot(&snapshot)?;
        Ok(merged)
    }

    fn patch_document(&self, id: &DocumentId, patch: DocumentPatch) -> Result<Option<Document>> {
        let _guard = self.lock_writer()?;
        let mut snapshot = self.read_snapshot()?;
        let patched = match snapshot.documents.iter_mut().find(|doc| &doc.id == id) {
            Some(existing) => {
                apply_patch(existing, patch);
                Some(existing.clone())
            }
            None => None,
        };
        if patched.is_some() {
            self.write_snapshot(&snapshot)?;
        }
        Ok(patched)
    }

    fn list_documents(&self) -> Result<Vec<Document>> {
        Ok(self.read_snapshot()?.documents)
    }

    fn replace_documents(&self, documents: Vec<Document>) -> Result<()> {
        let _guard = self.lock_writer()?;
        let mut snapshot = self.read_snapshot()?;
        snapshot.documents = documents;
        self.write_snapshot(&snapshot)
    }

    fn get_series(&self, key: &SeriesKey) -> Result<Option<Series>> {
        Ok(self.read_snapshot()?.series.into_iter().find(|series| &series.key() == key))
    }

    fn upsert_series(&self, mut series: Series) -> Result<Series> {
        let _guard = self.lock_writer()?;
        let mut snapshot = self.read_snapshot()?;
        match snapshot.series.iter_mut().find(|existing| existing.key() == series.key()) {
            Some(existing) => {
                // A stale write never rewinds the local numbering counter.
                series.current_sequence = series.current_sequence.max(existing.current_sequence);
                *existing = series.clone();
            }
            None => snapshot.series.push(series.clone()),
        }
        self.write_snapshot(&snapshot)?;
        Ok(series)
    }

    fn list_series(&self) -> Result<Vec<Series>> {
        Ok(self.read_snapshot()?.series)
    }

    fn health_check(&self) -> Result<()> {
        self.read_snapshot().map(|_| ())
    }
}
