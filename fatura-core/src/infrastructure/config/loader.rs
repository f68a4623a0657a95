use crate::foundation::{GatewayError, Result};
use crate::infrastructure::config::env::ENV_PREFIX;
use crate::infrastructure::config::types::GatewayConfig;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use std::path::Path;

/// Defaults, overlaid by the TOML file (when present), overlaid by
/// `FATURA_`-prefixed environment variables (`FATURA_MODE`, `FATURA_TAX_ID`,
/// nested keys split on `__`, e.g. `FATURA_LOG__FILTERS`).
pub fn load_gateway_config(path: &Path) -> Result<GatewayConfig> {
    let mut figment = Figment::from(Serialized::defaults(GatewayConfig::default()));
    if path.exists() {
        figment = figment.merge(Toml::file(path));
    }
    figment
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|err| GatewayError::ConfigError(err.to_string()))
}
