pub mod constants;
pub mod error;
pub mod types;
pub mod util;

pub use constants::*;
pub use error::{ErrorCode, ErrorContext, GatewayError, Result};
pub use types::{DocumentId, DocumentNo, RequestId, SeriesCode, SubmissionId, TaxId};
pub use util::time::{now_utc, timestamp_iso8601};
