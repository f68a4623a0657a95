/// Schema version stamped on every outbound Authority request.
pub const SCHEMA_VERSION: &str = "1.0";

/// Default deadline for a single remote Authority call.
pub const DEFAULT_BASE_TIMEOUT_MS: u64 = 10_000;

/// Relative filename of the snapshot store inside `data_dir`.
pub const DEFAULT_STORE_FILE: &str = "records.json";

/// Env var that freezes the wall clock for deterministic tests (RFC 3339).
pub const TEST_NOW_ENV_VAR: &str = "FATURA_TEST_NOW";

/// Currency used when a document does not specify one.
pub const DEFAULT_CURRENCY: &str = "AOA";
