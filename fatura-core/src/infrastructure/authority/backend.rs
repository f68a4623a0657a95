use crate::foundation::Result;
use crate::infrastructure::authority::types::{
    GetStatusParams, GetStatusResult, ListDocumentsParams, ListDocumentsResult, ListSeriesResult, LookupDocumentParams,
    LookupDocumentResult, RegisterDocumentParams, RegisterDocumentResult, RequestSeriesParams, SeriesInfo,
    ValidateDocumentParams, ValidateDocumentResult,
};
use async_trait::async_trait;

/// The seven Authority operations, answered either by the live service or by
/// the in-process mock. Callers and the protocol gateway are oblivious to
/// which backend answers.
#[async_trait]
pub trait AuthorityBackend: Send + Sync {
    async fn register_document(&self, params: RegisterDocumentParams) -> Result<RegisterDocumentResult>;
    async fn request_series(&self, params: RequestSeriesParams) -> Result<SeriesInfo>;
    async fn list_series(&self) -> Result<ListSeriesResult>;
    async fn get_status(&self, params: GetStatusParams) -> Result<GetStatusResult>;
    async fn list_documents(&self, params: ListDocumentsParams) -> Result<ListDocumentsResult>;
    async fn lookup_document(&self, params: LookupDocumentParams) -> Result<LookupDocumentResult>;
    async fn validate_document(&self, params: ValidateDocumentParams) -> Result<ValidateDocumentResult>;
}
