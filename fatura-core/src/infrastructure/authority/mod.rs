//! The Authority boundary: native operation shapes, the backend trait, the
//! signed HTTP client, the deadline wrapper and the protocol-accurate mock.

pub mod backend;
pub mod client;
pub mod mock;
pub mod timeout;
pub mod transport;
pub mod types;

pub use backend::AuthorityBackend;
pub use client::{ClientIdentity, HttpAuthorityClient};
pub use mock::MockAuthority;
pub use timeout::{retry, with_timeout};
pub use transport::{classify_status, HttpTransport};
pub use types::*;
