//! Status refresh coordination.
//!
//! Refresh is advisory for already-submitted documents, so the coordinator
//! never surfaces a remote failure as a hard error to an interactive caller:
//! it degrades to the best-known cached state plus the error as context.
//! Invariant: at most one in-flight remote status refresh per document id.

use crate::application::GatewayContext;
use crate::domain::{ensure_valid_transition, Document, DocumentPatch, ValidationStatus};
use crate::foundation::{now_utc, DocumentId, GatewayError, RequestId, Result};
use crate::infrastructure::authority::timeout::with_timeout;
use crate::infrastructure::authority::types::{GetStatusParams, GetStatusResult};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Registry entry for an in-flight background refresh. Ephemeral: removed on
/// completion, success or failure.
#[derive(Clone, Debug)]
pub struct SyncJob {
    pub started_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default)]
pub struct RefreshOutcome {
    /// Best-known state after the refresh attempt.
    pub document: Option<Document>,
    /// The remote failure encountered, when the document is cached state.
    pub sync_error: Option<String>,
    /// A background refresh for this id was already running.
    pub already_in_progress: bool,
}

#[derive(Clone)]
pub struct SyncCoordinator {
    ctx: GatewayContext,
    jobs: Arc<Mutex<HashMap<DocumentId, SyncJob>>>,
    last_errors: Arc<Mutex<HashMap<DocumentId, String>>>,
}

impl SyncCoordinator {
    pub fn new(ctx: GatewayContext) -> Self {
        Self { ctx, jobs: Arc::new(Mutex::new(HashMap::new())), last_errors: Arc::new(Mutex::new(HashMap::new())) }
    }

    fn lock_jobs(&self) -> MutexGuard<'_, HashMap<DocumentId, SyncJob>> {
        self.jobs.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_errors(&self) -> MutexGuard<'_, HashMap<DocumentId, String>> {
        self.last_errors.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Last remote failure recorded for this id, until superseded.
    pub fn last_error(&self, id: &DocumentId) -> Option<String> {
        self.lock_errors().get(id).cloned()
    }

    pub fn in_flight(&self, id: &DocumentId) -> bool {
        self.lock_jobs().contains_key(id)
    }

    /// Registers a job for `id` unless one is already running. Every remote
    /// refresh, sync or background, passes through this gate.
    fn begin(&self, id: &DocumentId) -> bool {
        let mut jobs = self.lock_jobs();
        if jobs.contains_key(id) {
            return false;
        }
        jobs.insert(id.clone(), SyncJob { started_at: now_utc() });
        true
    }

    fn finish(&self, id: &DocumentId) {
        self.lock_jobs().remove(id);
    }

    fn in_progress_outcome(&self, id: &DocumentId, cached: Document) -> RefreshOutcome {
        debug!("refresh already in progress id={}", id);
        RefreshOutcome { document: Some(cached), sync_error: self.last_error(id), already_in_progress: true }
    }

    /// Synchronous refresh: look the status up now, merge, and return the
    /// merged document — or the cached document plus the error when the
    /// remote call fails. Only local failures (missing document, storage)
    /// propagate as hard errors. When a refresh for the same id is already
    /// running, the call yields the cached document instead of issuing a
    /// second remote lookup.
    pub async fn refresh_now(&self, id: &DocumentId, timeout: Duration) -> Result<RefreshOutcome> {
        let cached = self
            .ctx
            .store
            .get_document(id)?
            .ok_or_else(|| GatewayError::NotFound(id.to_string()))?;

        let Some(request_id) = cached.request_id.clone() else {
            return Ok(RefreshOutcome {
                document: Some(cached),
                sync_error: Some("document has no requestID; not yet registered".to_string()),
                already_in_progress: false,
            });
        };

        if !self.begin(id) {
            return Ok(self.in_progress_outcome(id, cached));
        }
        let result = self.fetch_and_merge(id, &cached, request_id, timeout).await;
        self.finish(id);
        result
    }

    /// Background refresh: starts a job unless one is already registered for
    /// this id, and acknowledges immediately with the cached document.
    pub fn refresh_background(&self, id: &DocumentId) -> Result<RefreshOutcome> {
        let cached = self
            .ctx
            .store
            .get_document(id)?
            .ok_or_else(|| GatewayError::NotFound(id.to_string()))?;

        // Register before spawning so a second caller in the same window
        // observes the job no matter how the scheduler interleaves us.
        if !self.begin(id) {
            return Ok(self.in_progress_outcome(id, cached));
        }

        let coordinator = self.clone();
        let job_id = id.clone();
        let job_cached = cached.clone();
        let timeout = Duration::from_millis(self.ctx.config.base_timeout_ms);
        tokio::spawn(async move {
            let result = match job_cached.request_id.clone() {
                Some(request_id) => coordinator.fetch_and_merge(&job_id, &job_cached, request_id, timeout).await,
                None => {
                    debug!("skipping background refresh id={}: no requestID yet", job_id);
                    Ok(RefreshOutcome::default())
                }
            };
            if let Err(err) = result {
                warn!("background refresh failed id={} error={}", job_id, err);
                coordinator.lock_errors().insert(job_id.clone(), err.to_string());
            }
            coordinator.finish(&job_id);
        });

        info!("background refresh started id={}", id);
        Ok(RefreshOutcome { document: Some(cached), sync_error: None, already_in_progress: false })
    }

    /// The guarded remote leg: callers hold the job registration for `id`.
    async fn fetch_and_merge(
        &self,
        id: &DocumentId,
        cached: &Document,
        request_id: RequestId,
        timeout: Duration,
    ) -> Result<RefreshOutcome> {
        let params = GetStatusParams { request_id };
        let remote = with_timeout("GetStatus", timeout, self.ctx.backend.get_status(params)).await;

        match remote {
            Ok(status) => {
                let merged = self.merge_status(cached, &status)?;
                self.lock_errors().remove(id);
                Ok(RefreshOutcome { document: Some(merged), sync_error: None, already_in_progress: false })
            }
            Err(err) if err.is_remote() => {
                warn!("status refresh degraded to cache id={} error={}", id, err);
                let message = err.to_string();
                self.lock_errors().insert(id.clone(), message.clone());
                Ok(RefreshOutcome { document: Some(cached.clone()), sync_error: Some(message), already_in_progress: false })
            }
            Err(err) => Err(err),
        }
    }

    /// Applies one remote status payload to the cached record.
    ///
    /// Completions across different ids are unordered by design; each job
    /// only ever touches its own document.
    fn merge_status(&self, cached: &Document, status: &GetStatusResult) -> Result<Document> {
        let digest = hex::encode(Sha256::digest(serde_json::to_vec(status)?));

        let mut new_status = None;
        let mut messages = Vec::new();
        for outcome in &status.documents {
            if !cached.document_nos.contains(&outcome.document_no) {
                continue;
            }
            if let Some(message) = &outcome.message {
                messages.push(message.clone());
            }
            if new_status.is_none() {
                new_status = outcome.outcome.as_deref().and_then(ValidationStatus::from_code_str);
            }
        }

        let validation_status = match (cached.validation_status, new_status) {
            (Some(current), Some(next)) => match ensure_valid_transition(&current, &next) {
                Ok(()) => Some(next),
                Err(err) => {
                    // The Authority re-reported an impossible move; keep ours.
                    warn!("rejecting status transition id={} error={}", cached.id, err);
                    None
                }
            },
            (None, Some(next)) => Some(next),
            _ => None,
        };

        let patch = DocumentPatch {
            validation_status,
            validation_messages: if messages.is_empty() { None } else { Some(messages) },
            last_sync_at: Some(now_utc()),
            last_payload_digest: Some(digest),
            ..Default::default()
        };

        self.ctx
            .store
            .patch_document(&cached.id, patch)?
            .ok_or_else(|| GatewayError::NotFound(cached.id.to_string()))
    }
}
