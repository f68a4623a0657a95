use crate::foundation::constants::{DEFAULT_BASE_TIMEOUT_MS, DEFAULT_STORE_FILE};
use serde::{Deserialize, Serialize};

/// Which backend answers the seven Authority operations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendMode {
    /// Sign and submit to the real Authority service.
    Live,
    /// Answer from the in-process protocol-accurate mock.
    #[default]
    Simulated,
}

impl std::fmt::Display for BackendMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Live => write!(f, "live"),
            Self::Simulated => write!(f, "simulated"),
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SoftwareConfig {
    /// Product descriptor sent as `softwareInfo.descriptor`.
    #[serde(default)]
    pub descriptor: String,
    /// Product certificate signature sent as `softwareInfo.signature`.
    #[serde(default)]
    pub signature: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LogConfig {
    /// Optional directory for rolling log files; console-only when unset.
    #[serde(default)]
    pub dir: Option<String>,
    /// Filter expression, e.g. `"info"`, `"fatura_core=debug"`, `"root=info"`.
    #[serde(default = "default_log_filters")]
    pub filters: String,
}

fn default_log_filters() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { dir: None, filters: default_log_filters() }
    }
}

/// Base configuration for the gateway. Defaults favor simulated mode so the
/// gateway runs with no credentials configured.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub mode: BackendMode,
    /// Base URL of the live Authority service. Required in live mode.
    #[serde(default)]
    pub authority_url: String,
    /// Emitter tax id stamped on every request envelope.
    #[serde(default)]
    pub tax_id: String,
    #[serde(default)]
    pub software: SoftwareConfig,
    /// Path to the RSA private key PEM used for request signing. Required in
    /// live mode.
    #[serde(default)]
    pub signing_key_path: Option<String>,
    /// Deadline for a single remote Authority call.
    #[serde(default = "default_base_timeout_ms")]
    pub base_timeout_ms: u64,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    /// Snapshot store filename, relative to `data_dir` unless absolute.
    #[serde(default = "default_store_file")]
    pub store_file: String,
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    #[serde(default)]
    pub log: LogConfig,
}

fn default_base_timeout_ms() -> u64 {
    DEFAULT_BASE_TIMEOUT_MS
}

fn default_data_dir() -> String {
    ".fatura".to_string()
}

fn default_store_file() -> String {
    DEFAULT_STORE_FILE.to_string()
}

fn default_listen_addr() -> String {
    "127.0.0.1:8750".to_string()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            mode: BackendMode::default(),
            authority_url: String::new(),
            tax_id: String::new(),
            software: SoftwareConfig::default(),
            signing_key_path: None,
            base_timeout_ms: default_base_timeout_ms(),
            data_dir: default_data_dir(),
            store_file: default_store_file(),
            listen_addr: default_listen_addr(),
            log: LogConfig::default(),
        }
    }
}

impl GatewayConfig {
    /// Collects configuration issues instead of failing on the first one.
    pub fn validate(&self) -> std::result::Result<(), Vec<String>> {
        let mut errors = Vec::new();
        if self.mode == BackendMode::Live {
            if self.authority_url.trim().is_empty() {
                errors.push("live mode requires authority_url".to_string());
            }
            if self.signing_key_path.as_deref().unwrap_or("").trim().is_empty() {
                errors.push("live mode requires signing_key_path".to_string());
            }
        }
        if self.tax_id.trim().is_empty() {
            errors.push("tax_id is required".to_string());
        }
        if self.base_timeout_ms == 0 {
            errors.push("base_timeout_ms must be positive".to_string());
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn store_path(&self) -> std::path::PathBuf {
        let store = std::path::Path::new(&self.store_file);
        if store.is_absolute() {
            store.to_path_buf()
        } else {
            std::path::Path::new(&self.data_dir).join(store)
        }
    }
}
