#![allow(dead_code)]

use crate::fixtures::{TEST_CURRENCY, TEST_SIGNING_KEY_FILE, TEST_TAX_ID};
use fatura_core::application::{DocumentDraft, GatewayContext};
use fatura_core::domain::{Document, DocumentLine, DocumentType};
use fatura_core::foundation::{DocumentId, DocumentNo, TaxId};
use fatura_core::infrastructure::authority::{AuthorityBackend, MockAuthority};
use fatura_core::infrastructure::config::GatewayConfig;
use fatura_core::infrastructure::storage::{MemoryStore, RecordStore};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub fn gateway_config() -> GatewayConfig {
    GatewayConfig { tax_id: TEST_TAX_ID.to_string(), ..GatewayConfig::default() }
}

/// Context over an in-memory store and the simulated Authority.
pub fn simulated_context() -> GatewayContext {
    context_with_backend(Arc::new(MockAuthority::new(TaxId::from(TEST_TAX_ID))))
}

pub fn context_with_backend(backend: Arc<dyn AuthorityBackend>) -> GatewayContext {
    GatewayContext::new(Arc::new(gateway_config()), Arc::new(MemoryStore::default()), backend)
}

pub fn context_with_store(store: Arc<dyn RecordStore>, backend: Arc<dyn AuthorityBackend>) -> GatewayContext {
    GatewayContext::new(Arc::new(gateway_config()), store, backend)
}

pub fn invoice_line(quantity: i64, unit_price: i64, tax_rate: i64) -> DocumentLine {
    DocumentLine {
        description: None,
        quantity: Decimal::from(quantity),
        unit_price: Decimal::from(unit_price),
        tax_rate: Decimal::from(tax_rate),
    }
}

pub fn invoice_draft(document_no: &str) -> DocumentDraft {
    DocumentDraft {
        document_no: DocumentNo::from(document_no),
        document_type: DocumentType::FT,
        lines: vec![invoice_line(1, 100, 14)],
        currency: TEST_CURRENCY.to_string(),
    }
}

pub fn pending_document(id: &str, document_no: &str) -> Document {
    Document::new(
        DocumentId::from(id),
        TaxId::from(TEST_TAX_ID),
        DocumentNo::from(document_no),
        vec![invoice_line(1, 100, 14)],
        TEST_CURRENCY,
    )
}

pub fn signing_key_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(TEST_SIGNING_KEY_FILE)
}

pub fn signing_key_pem() -> Vec<u8> {
    std::fs::read(signing_key_path()).expect("test signing key fixture")
}
