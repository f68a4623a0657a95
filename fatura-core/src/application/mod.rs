//! Application layer: orchestration across domain logic and infrastructure I/O.

pub mod register;
pub mod sync;

pub use register::{register_document, request_series, DocumentDraft};
pub use sync::{RefreshOutcome, SyncCoordinator};

use crate::infrastructure::authority::AuthorityBackend;
use crate::infrastructure::config::GatewayConfig;
use crate::infrastructure::storage::RecordStore;
use std::sync::Arc;

/// Composition root state: the store, the configured backend and the config.
///
/// Owned explicitly instead of living in process-wide statics so tests can
/// run multiple isolated gateway instances.
#[derive(Clone)]
pub struct GatewayContext {
    pub config: Arc<GatewayConfig>,
    pub store: Arc<dyn RecordStore>,
    pub backend: Arc<dyn AuthorityBackend>,
}

impl GatewayContext {
    pub fn new(config: Arc<GatewayConfig>, store: Arc<dyn RecordStore>, backend: Arc<dyn AuthorityBackend>) -> Self {
        Self { config, store, backend }
    }
}
