pub mod env;
pub mod loader;
pub mod types;

pub use env::{resolve_config_path, resolve_data_dir};
pub use loader::load_gateway_config;
pub use types::{BackendMode, GatewayConfig, LogConfig, SoftwareConfig};
