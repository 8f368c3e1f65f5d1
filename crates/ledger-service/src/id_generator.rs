//! Business identifier generation.

use chrono::{Local, NaiveDate};
use std::sync::atomic::{AtomicU64, Ordering};

const PREFIX: &str = "TXN";
const SEQUENCE_MODULUS: u64 = 10_000;

/// Generates `TXN` + `YYYYMMDD` + 4-digit sequence identifiers.
///
/// The sequence starts at 1 and is shared by every caller holding the same
/// generator. It is not persisted, so a restart on the same day can reissue
/// identifiers; the store's uniqueness check reports those as duplicates.
#[derive(Debug)]
pub struct TransactionIdGenerator {
    sequence: AtomicU64,
}

impl TransactionIdGenerator {
    /// Creates a generator whose first sequence value is `start`.
    #[must_use]
    pub const fn starting_at(start: u64) -> Self {
        Self {
            sequence: AtomicU64::new(start),
        }
    }

    /// Generates an identifier for the current local date.
    pub fn generate(&self) -> String {
        self.generate_for(Local::now().date_naive())
    }

    /// Generates an identifier for the given date.
    pub fn generate_for(&self, date: NaiveDate) -> String {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        format!(
            "{PREFIX}{}{:04}",
            date.format("%Y%m%d"),
            seq % SEQUENCE_MODULUS
        )
    }
}

impl Default for TransactionIdGenerator {
    fn default() -> Self {
        Self::starting_at(1)
    }
}
