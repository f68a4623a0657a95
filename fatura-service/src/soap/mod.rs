//! Legacy XML envelope bridge.
//!
//! A stateless translation boundary: envelope in, native backend call,
//! envelope out. Failures of any kind become a structured fault envelope.

pub mod envelope;
pub mod operations;

pub use envelope::{parse_request, render_fault, render_response, ParsedRequest, ResponseField, SOAP_NAMESPACE};
pub use operations::dispatch;
