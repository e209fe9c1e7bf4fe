pub mod json_backend;

use std::{
    collections::BTreeMap,
    sync::{Mutex, MutexGuard},
};

use serde::{Deserialize, Serialize};

use crate::{
    errors::{IntakeError, Result},
    ledger::DateKey,
};

/// Persistence collaborator backing the intake ledger.
///
/// Each `get` and each `set` is atomic on its own; nothing spans a pair of calls.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}

/// How long ledger entries are kept.
///
/// The ledger itself never deletes anything. A policy other than `KeepAll` only
/// takes effect when a backend's compaction step is run explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "mode", content = "days", rename_all = "snake_case")]
pub enum RetentionPolicy {
    #[default]
    KeepAll,
    /// Keep the given number of most recent calendar days, the reference day included.
    KeepDays(u32),
}

impl RetentionPolicy {
    /// Oldest date still retained relative to `today`, or `None` when nothing expires.
    pub fn horizon(&self, today: DateKey) -> Option<DateKey> {
        match self {
            RetentionPolicy::KeepAll => None,
            RetentionPolicy::KeepDays(days) => today.minus_days(days.saturating_sub(1)),
        }
    }

    pub fn label(&self) -> String {
        match self {
            RetentionPolicy::KeepAll => "keep all".into(),
            RetentionPolicy::KeepDays(1) => "keep 1 day".into(),
            RetentionPolicy::KeepDays(days) => format!("keep {days} days"),
        }
    }
}

/// In-process key-value store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = entries
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        Self {
            entries: Mutex::new(map),
        }
    }

    pub fn len(&self) -> usize {
        self.lock().map(|guard| guard.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| IntakeError::StorageFailure("memory store lock poisoned".into()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_overwrites_unconditionally() {
        let store = MemoryStore::new();
        assert_eq!(store.get("2024-06-01").unwrap(), None);
        store.set("2024-06-01", "500").unwrap();
        store.set("2024-06-01", "100").unwrap();
        assert_eq!(store.get("2024-06-01").unwrap().as_deref(), Some("100"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn retention_horizon_counts_reference_day() {
        let today = DateKey::parse("2024-06-07").unwrap();
        assert_eq!(RetentionPolicy::KeepAll.horizon(today), None);
        assert_eq!(
            RetentionPolicy::KeepDays(7).horizon(today),
            Some(DateKey::parse("2024-06-01").unwrap())
        );
        assert_eq!(RetentionPolicy::KeepDays(1).horizon(today), Some(today));
    }

    #[test]
    fn retention_policy_serializes_with_mode_tag() {
        let json = serde_json::to_string(&RetentionPolicy::KeepDays(30)).unwrap();
        assert_eq!(json, r#"{"mode":"keep_days","days":30}"#);
        let keep_all: RetentionPolicy = serde_json::from_str(r#"{"mode":"keep_all"}"#).unwrap();
        assert_eq!(keep_all, RetentionPolicy::KeepAll);
    }
}
