//! File-backed key-value store holding the ledger as one flat JSON object.

use std::{
    collections::BTreeMap,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{
    errors::{IntakeError, Result},
    ledger::DateKey,
    utils::paths::{ensure_dir, tmp_path},
};

use super::{KeyValueStore, RetentionPolicy};

type Entries = BTreeMap<String, String>;

/// Persists `{"YYYY-MM-DD": "<ml>", ...}` to a single file, replaced atomically on every write.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<Entries>,
}

impl JsonFileStore {
    /// Opens the store at `path`, starting empty when the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            ensure_dir(parent)?;
        }
        let entries = if path.exists() {
            let data = fs::read_to_string(&path)?;
            if data.trim().is_empty() {
                Entries::new()
            } else {
                let raw: BTreeMap<String, Value> = serde_json::from_str(&data)?;
                raw.into_iter()
                    .map(|(key, value)| {
                        let text = stored_text(&key, value);
                        (key, text)
                    })
                    .collect()
            }
        } else {
            Entries::new()
        };
        debug!(path = %path.display(), entries = entries.len(), "opened intake store");
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Removes date entries older than the policy's horizon and returns how many were dropped.
    ///
    /// Keys that are not canonical dates are left alone. On a failed write the in-memory
    /// view is restored and the file keeps its previous contents.
    pub fn compact(&self, policy: RetentionPolicy, today: DateKey) -> Result<usize> {
        let Some(horizon) = policy.horizon(today) else {
            return Ok(0);
        };
        let mut entries = self.lock()?;
        let snapshot = entries.clone();
        entries.retain(|key, _| match DateKey::parse(key) {
            Ok(date) => date >= horizon,
            Err(_) => true,
        });
        let removed = snapshot.len() - entries.len();
        if removed == 0 {
            return Ok(0);
        }
        if let Err(err) = write_atomic(&self.path, &entries) {
            *entries = snapshot;
            return Err(err);
        }
        info!(removed, horizon = %horizon, "compacted intake store");
        Ok(removed)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Entries>> {
        self.entries
            .lock()
            .map_err(|_| IntakeError::StorageFailure("intake store lock poisoned".into()))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.lock()?;
        let previous = entries.insert(key.to_string(), value.to_string());
        if let Err(err) = write_atomic(&self.path, &entries) {
            match previous {
                Some(old) => entries.insert(key.to_string(), old),
                None => entries.remove(key),
            };
            warn!(key, error = %err, "intake store write failed; change discarded");
            return Err(err);
        }
        Ok(())
    }
}

/// Flattens a loaded value to the string form the store hands out.
///
/// Numbers keep their decimal text; anything else is kept as raw JSON so readers
/// see a malformed value rather than a failed open.
fn stored_text(key: &str, value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Number(number) => number.to_string(),
        other => {
            warn!(key, value = %other, "non-numeric intake value loaded as raw text");
            other.to_string()
        }
    }
}

fn write_atomic(path: &Path, entries: &Entries) -> Result<()> {
    let json = serde_json::to_string_pretty(entries)?;
    let tmp = tmp_path(path);
    let staged = File::create(&tmp).and_then(|mut file| {
        file.write_all(json.as_bytes())?;
        file.flush()?;
        file.sync_all()
    });
    if let Err(err) = staged {
        discard_staged(&tmp);
        return Err(IntakeError::StorageFailure(format!(
            "failed to stage `{}`: {err}",
            tmp.display()
        )));
    }
    fs::rename(&tmp, path).map_err(|err| {
        discard_staged(&tmp);
        IntakeError::StorageFailure(format!(
            "failed to replace `{}` with `{}`: {err}",
            path.display(),
            tmp.display()
        ))
    })
}

fn discard_staged(tmp: &Path) {
    if tmp.is_file() {
        if let Err(err) = fs::remove_file(tmp) {
            warn!(path = %tmp.display(), error = %err, "could not remove staged intake file");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::IntakeLedger;
    use tempfile::tempdir;

    #[test]
    fn values_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("intake.json");

        let store = JsonFileStore::open(&path).unwrap();
        store.set("2024-06-01", "500").unwrap();
        drop(store);

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.get("2024-06-01").unwrap().as_deref(), Some("500"));
        assert_eq!(reopened.get("2024-06-02").unwrap(), None);
    }

    #[test]
    fn file_is_a_flat_string_map() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("intake.json");
        let store = JsonFileStore::open(&path).unwrap();
        store.set("2024-06-01", "300").unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw, serde_json::json!({ "2024-06-01": "300" }));
    }

    #[test]
    fn failed_write_keeps_previous_value() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("intake.json");
        let store = JsonFileStore::open(&path).unwrap();
        store.set("2024-06-01", "300").unwrap();

        // A directory at the staging path makes File::create fail.
        fs::create_dir_all(tmp_path(&path)).unwrap();

        let err = store.set("2024-06-01", "900").unwrap_err();
        match &err {
            IntakeError::StorageFailure(message) => assert!(message.contains("intake.json.tmp")),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(store.get("2024-06-01").unwrap().as_deref(), Some("300"));
        let on_disk = fs::read_to_string(&path).unwrap();
        assert!(on_disk.contains("\"300\""));
    }

    #[test]
    fn compaction_respects_policy() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("intake.json")).unwrap();
        for (key, value) in [
            ("2024-05-01", "100"),
            ("2024-06-01", "200"),
            ("2024-06-07", "300"),
            ("notes", "keep me"),
        ] {
            store.set(key, value).unwrap();
        }
        let today = DateKey::parse("2024-06-07").unwrap();

        assert_eq!(store.compact(RetentionPolicy::KeepAll, today).unwrap(), 0);
        assert_eq!(store.compact(RetentionPolicy::KeepDays(7), today).unwrap(), 1);
        assert_eq!(store.get("2024-05-01").unwrap(), None);
        assert_eq!(store.get("2024-06-01").unwrap().as_deref(), Some("200"));
        assert_eq!(store.get("notes").unwrap().as_deref(), Some("keep me"));
    }

    #[test]
    fn malformed_file_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("intake.json");
        fs::write(&path, "not json").unwrap();
        let err = JsonFileStore::open(&path).unwrap_err();
        assert!(matches!(err, IntakeError::Serde(_)));
    }

    #[test]
    fn failed_rename_removes_staged_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("intake.json");
        let store = JsonFileStore::open(&path).unwrap();

        // Renaming a file over a directory fails after staging succeeded.
        fs::create_dir_all(&path).unwrap();

        let err = store.set("2024-06-01", "900").unwrap_err();
        assert!(matches!(err, IntakeError::StorageFailure(_)));
        assert!(!tmp_path(&path).exists());
        assert_eq!(store.get("2024-06-01").unwrap(), None);
    }

    #[test]
    fn mixed_value_types_load_without_failing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("intake.json");
        fs::write(
            &path,
            r#"{ "2024-06-01": "300", "2024-06-02": 700, "2024-06-03": null, "2024-06-04": [1] }"#,
        )
        .unwrap();

        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.get("2024-06-01").unwrap().as_deref(), Some("300"));
        assert_eq!(store.get("2024-06-02").unwrap().as_deref(), Some("700"));
        assert_eq!(store.get("2024-06-03").unwrap().as_deref(), Some("null"));

        let ledger = IntakeLedger::new(store);
        let date = |raw: &str| DateKey::parse(raw).unwrap();
        assert_eq!(ledger.get_intake(date("2024-06-01")), 300);
        assert_eq!(ledger.get_intake(date("2024-06-02")), 700);
        assert_eq!(ledger.get_intake(date("2024-06-03")), 0);
        assert_eq!(ledger.get_intake(date("2024-06-04")), 0);
        assert_eq!(ledger.add_intake(date("2024-06-02"), 50).unwrap(), 750);
    }
}
