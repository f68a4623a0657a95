use chrono::{DateTime, SecondsFormat, Utc};

/// Returns the current wall-clock time.
///
/// For test determinism, this respects `FATURA_TEST_NOW` (RFC 3339) when set.
pub fn now_utc() -> DateTime<Utc> {
    if let Ok(value) = std::env::var(crate::foundation::constants::TEST_NOW_ENV_VAR) {
        if let Ok(frozen) = DateTime::parse_from_rfc3339(value.trim()) {
            return frozen.with_timezone(&Utc);
        }
    }
    Utc::now()
}

/// ISO-8601 timestamp with second precision, as stamped on request envelopes.
pub fn timestamp_iso8601(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}
