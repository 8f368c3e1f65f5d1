//! Cache key generators for consistent key naming.

/// Key of the cached total record count.
pub const TOTAL_COUNT: &str = "transaction:total:count";

const RECORD_PREFIX: &str = "transaction:data";

/// Key of the cached snapshot of one record.
#[must_use]
pub fn record(transaction_id: &str) -> String {
    format!("{RECORD_PREFIX}:{transaction_id}")
}
