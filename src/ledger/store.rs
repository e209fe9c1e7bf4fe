//! Date-keyed cumulative intake counters over a [`KeyValueStore`].
//!
//! Every value is the decimal string of the day's total in milliliters, stored
//! under the canonical `YYYY-MM-DD` key. Totals only grow: `add_intake` is the
//! sole mutation and it rejects non-positive amounts.
//!
//! `add_intake` is a plain read followed by a write. Two writers touching the
//! same day can lose an update; callers are expected to run one writer at a
//! time.

use tracing::{debug, info, warn};

use crate::{
    errors::{IntakeError, Result},
    storage::KeyValueStore,
};

use super::DateKey;

/// Parses raw user input into a strictly positive milliliter amount.
pub fn parse_amount(raw: &str) -> Result<u64> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(IntakeError::InvalidAmount(format!(
            "`{}` is not a positive whole number",
            raw.trim()
        )));
    }
    let amount: u64 = digits
        .parse()
        .map_err(|_| IntakeError::InvalidAmount(format!("`{trimmed}` is too large")))?;
    if amount == 0 {
        return Err(IntakeError::InvalidAmount("amount must be greater than zero".into()));
    }
    Ok(amount)
}

/// Owns read and write access to the persisted intake mapping.
#[derive(Debug)]
pub struct IntakeLedger<S> {
    store: S,
}

impl<S: KeyValueStore> IntakeLedger<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Returns the day's total, or 0 when nothing was recorded.
    ///
    /// Read failures and unparseable values both read as 0.
    pub fn get_intake(&self, date: DateKey) -> u64 {
        let key = date.as_key();
        match self.store.get(&key) {
            Ok(Some(raw)) => decode_total(&key, &raw),
            Ok(None) => 0,
            Err(err) => {
                warn!(date = %key, error = %err, "intake read failed; reporting zero");
                0
            }
        }
    }

    /// Adds `amount` milliliters to the day's total and returns the new total.
    pub fn add_intake(&self, date: DateKey, amount: u64) -> Result<u64> {
        if amount == 0 {
            return Err(IntakeError::InvalidAmount(
                "amount must be greater than zero".into(),
            ));
        }
        let key = date.as_key();
        // A read error must not be mistaken for an empty day here, or the write
        // below would replace the stored total with `amount`.
        let current = match self.store.get(&key) {
            Ok(Some(raw)) => decode_total(&key, &raw),
            Ok(None) => 0,
            Err(err) => return Err(storage_failure("read", &key, err)),
        };
        let total = current.checked_add(amount).ok_or_else(|| {
            IntakeError::InvalidAmount(format!("adding {amount} ml to {current} ml overflows"))
        })?;
        self.store
            .set(&key, &total.to_string())
            .map_err(|err| storage_failure("write", &key, err))?;
        info!(date = %key, amount, total, "recorded intake");
        Ok(total)
    }

    /// Parses `raw` with [`parse_amount`] and records it.
    pub fn add_raw_intake(&self, date: DateKey, raw: &str) -> Result<u64> {
        let amount = parse_amount(raw)?;
        self.add_intake(date, amount)
    }
}

fn decode_total(key: &str, raw: &str) -> u64 {
    match raw.trim().parse::<u64>() {
        Ok(total) => {
            debug!(date = key, total, "read intake");
            total
        }
        Err(_) => {
            warn!(date = key, value = raw, "stored intake is not a number; treating as zero");
            0
        }
    }
}

fn storage_failure(op: &str, key: &str, err: IntakeError) -> IntakeError {
    match err {
        IntakeError::StorageFailure(_) => err,
        other => IntakeError::StorageFailure(format!("{op} of `{key}` failed: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn day(raw: &str) -> DateKey {
        DateKey::parse(raw).unwrap()
    }

    /// Counts calls and optionally fails them.
    #[derive(Default)]
    struct ProbeStore {
        inner: MemoryStore,
        gets: AtomicUsize,
        sets: AtomicUsize,
        fail_get: bool,
        fail_set: bool,
    }

    impl KeyValueStore for ProbeStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.gets.fetch_add(1, Ordering::SeqCst);
            if self.fail_get {
                return Err(IntakeError::StorageFailure("disk unavailable".into()));
            }
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<()> {
            self.sets.fetch_add(1, Ordering::SeqCst);
            if self.fail_set {
                return Err(IntakeError::Io(std::io::Error::other("disk full")));
            }
            self.inner.set(key, value)
        }
    }

    #[test]
    fn parse_amount_accepts_positive_integers() {
        assert_eq!(parse_amount("500").unwrap(), 500);
        assert_eq!(parse_amount("  250 ").unwrap(), 250);
        assert_eq!(parse_amount("+40").unwrap(), 40);
    }

    #[test]
    fn parse_amount_rejects_everything_else() {
        for raw in ["", "  ", "0", "-5", "abc", "12.5", "500ml", "1e3", "+", "--1"] {
            let err = parse_amount(raw).unwrap_err();
            assert!(
                matches!(err, IntakeError::InvalidAmount(_)),
                "expected InvalidAmount for `{raw}`"
            );
        }
        assert!(parse_amount("99999999999999999999999").is_err());
    }

    #[test]
    fn first_addition_creates_entry() {
        let ledger = IntakeLedger::new(MemoryStore::new());
        assert_eq!(ledger.add_intake(day("2024-06-01"), 500).unwrap(), 500);
        assert_eq!(ledger.get_intake(day("2024-06-01")), 500);
        assert_eq!(
            ledger.store().get("2024-06-01").unwrap().as_deref(),
            Some("500")
        );
    }

    #[test]
    fn successful_add_reads_once_and_writes_once() {
        let ledger = IntakeLedger::new(ProbeStore::default());
        ledger.add_intake(day("2024-06-01"), 200).unwrap();
        assert_eq!(ledger.store().gets.load(Ordering::SeqCst), 1);
        assert_eq!(ledger.store().sets.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn rejected_amount_touches_nothing() {
        let ledger = IntakeLedger::new(ProbeStore::default());
        assert!(ledger.add_intake(day("2024-06-01"), 0).is_err());
        assert!(ledger.add_raw_intake(day("2024-06-01"), "-5").is_err());
        assert!(ledger.add_raw_intake(day("2024-06-01"), "lots").is_err());
        assert_eq!(ledger.store().gets.load(Ordering::SeqCst), 0);
        assert_eq!(ledger.store().sets.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn malformed_stored_value_reads_as_zero() {
        let store = MemoryStore::with_entries([("2024-06-01", "a lot")]);
        let ledger = IntakeLedger::new(store);
        assert_eq!(ledger.get_intake(day("2024-06-01")), 0);
        assert_eq!(ledger.add_intake(day("2024-06-01"), 150).unwrap(), 150);
    }

    #[test]
    fn failed_read_is_zero_for_display_but_blocks_addition() {
        let store = ProbeStore {
            fail_get: true,
            ..ProbeStore::default()
        };
        store.inner.set("2024-06-01", "800").unwrap();
        let ledger = IntakeLedger::new(store);

        assert_eq!(ledger.get_intake(day("2024-06-01")), 0);
        let err = ledger.add_intake(day("2024-06-01"), 100).unwrap_err();
        assert!(matches!(err, IntakeError::StorageFailure(_)));
        assert_eq!(ledger.store().sets.load(Ordering::SeqCst), 0);
        assert_eq!(
            ledger.store().inner.get("2024-06-01").unwrap().as_deref(),
            Some("800")
        );
    }

    #[test]
    fn failed_write_surfaces_as_storage_failure() {
        let store = ProbeStore {
            fail_set: true,
            ..ProbeStore::default()
        };
        store.inner.set("2024-06-01", "800").unwrap();
        let ledger = IntakeLedger::new(store);

        let err = ledger.add_intake(day("2024-06-01"), 100).unwrap_err();
        assert!(matches!(err, IntakeError::StorageFailure(_)));
        assert_eq!(ledger.get_intake(day("2024-06-01")), 800);
    }

    #[test]
    fn overflow_is_rejected_without_write() {
        let store = MemoryStore::with_entries([("2024-06-01", u64::MAX.to_string())]);
        let ledger = IntakeLedger::new(store);
        let err = ledger.add_intake(day("2024-06-01"), 1).unwrap_err();
        assert!(matches!(err, IntakeError::InvalidAmount(_)));
        assert_eq!(ledger.get_intake(day("2024-06-01")), u64::MAX);
    }
}
