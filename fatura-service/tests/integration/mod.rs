
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use fatura_core::application::GatewayContext;
use fatura_core::foundation::TaxId;
use fatura_core::infrastructure::authority::MockAuthority;
use fatura_core::infrastructure::config::GatewayConfig;
use fatura_core::infrastructure::storage::MemoryStore;
use fatura_service::api::{build_router, ApiState};
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_TAX_ID: &str = "500123456";

fn test_state() -> Arc<ApiState> {
    let config = GatewayConfig { tax_id: TEST_TAX_ID.to_string(), ..GatewayConfig::default() };
    let ctx = GatewayContext::new(
        Arc::new(config),
        Arc::new(MemoryStore::default()),
        Arc::new(MockAuthority::new(TaxId::from(TEST_TAX_ID))),
    );
    Arc::new(ApiState::new(ctx))
}

pub fn test_router() -> (Router, Arc<ApiState>) {
    let state = test_state();
    (build_router(state.clone()), state)
}

pub async fn post_soap(router: &Router, xml: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method("POST")
        .uri("/soap")
        .header("content-type", "text/xml; charset=utf-8")
        .body(Body::from(xml.to_string()))
        .expect("request");

    let response = router.clone().oneshot(request).await.expect("soap response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body bytes");
    (status, String::from_utf8(bytes.to_vec()).expect("utf8 body"))
}

pub async fn get_json(router: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder().method("GET").uri(uri).body(Body::empty()).expect("request");
    let response = router.clone().oneshot(request).await.expect("json response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body bytes");
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

pub async fn post_json(router: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder().method("POST").uri(uri).body(Body::empty()).expect("request");
    let response = router.clone().oneshot(request).await.expect("json response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body bytes");
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

/// One `<Op>Request` envelope with flat child fields.
pub fn soap_request(operation: &str, fields: &[(&str, &str)]) -> String {
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!("<{name}>{value}</{name}>"));
    }
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
         <Envelope xmlns=\"urn:fatura:authority:v1\"><Header/><Body>\
         <{operation}Request>{body}</{operation}Request>\
         </Body></Envelope>"
    )
}
