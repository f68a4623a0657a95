use crate::foundation::{GatewayError, Result};
use std::path::{Path, PathBuf};

pub const CONFIG_PATH_ENV: &str = "FATURA_CONFIG_PATH";
pub const DATA_DIR_ENV: &str = "FATURA_DATA_DIR";
pub const ENV_PREFIX: &str = "FATURA_";

pub fn resolve_config_path(data_dir: &Path) -> PathBuf {
    if let Ok(value) = std::env::var(CONFIG_PATH_ENV) {
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    data_dir.join("fatura.toml")
}

pub fn resolve_data_dir() -> Result<PathBuf> {
    if let Ok(data_dir) = std::env::var(DATA_DIR_ENV) {
        let trimmed = data_dir.trim();
        if !trimmed.is_empty() {
            return Ok(PathBuf::from(trimmed));
        }
    }
    let cwd = std::env::current_dir().map_err(|err| GatewayError::Message(err.to_string()))?;
    Ok(cwd.join(".fatura"))
}
