//! Local history of viewed cities: the last successfully displayed city
//! plus an ordered, de-duplicated list of recent cities, persisted across
//! sessions. The store is best-effort by contract: reads degrade to
//! empty/absent and writes fail silently, so it can never take down a
//! lookup that otherwise succeeded.

use std::{collections::HashMap, fs, path::PathBuf, sync::Mutex};

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Storage key for the last viewed city (plain string).
pub const LAST_CITY_KEY: &str = "lastCity";

/// Storage key for the recent-city list (JSON array of [`RecentCity`]).
pub const CITY_HISTORY_KEY: &str = "cityHistory";

/// Upper bound on the recent-city list.
pub const MAX_HISTORY_ITEMS: usize = 5;

/// String key/value persistence, the shape of browser local storage.
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// File-backed storage: one file per key under a platform data directory.
#[derive(Debug)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open storage at the platform data directory for this application.
    pub fn open() -> Result<Self> {
        let dirs = ProjectDirs::from("dev", "meteo", "meteo-cli")
            .ok_or_else(|| anyhow!("Could not determine platform data directory"))?;

        Ok(Self { dir: dirs.data_dir().to_path_buf() })
    }

    /// Open storage rooted at an explicit directory.
    pub fn at(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read storage file: {}", path.display()))?;

        Ok(Some(contents))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir).with_context(|| {
            format!("Failed to create storage directory: {}", self.dir.display())
        })?;

        let path = self.key_path(key);
        fs::write(&path, value)
            .with_context(|| format!("Failed to write storage file: {}", path.display()))?;

        Ok(())
    }
}

/// In-memory storage, used in tests and for callers that do not want
/// persistence.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().map_err(|_| anyhow!("Storage mutex poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|_| anyhow!("Storage mutex poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// A persisted history entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentCity {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub full_name: String,
    pub timestamp: DateTime<Utc>,
}

/// Input to [`HistoryStore::record_city`]: a successfully displayed city.
#[derive(Debug, Clone, PartialEq)]
pub struct CityRecord {
    pub name: String,
    pub region: Option<String>,
    pub country: Option<String>,
    pub full_name: String,
}

/// Last city + bounded recent-city list over a [`Storage`] backend.
#[derive(Debug)]
pub struct HistoryStore<S> {
    storage: S,
}

impl<S: Storage> HistoryStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Full name of the most recently displayed city, if any.
    pub fn last_city(&self) -> Option<String> {
        self.storage.get(LAST_CITY_KEY).ok().flatten().filter(|name| !name.is_empty())
    }

    /// The recent-city list, most recent first. Absent or corrupt stored
    /// data yields an empty list, never an error.
    pub fn history(&self) -> Vec<RecentCity> {
        self.storage
            .get(CITY_HISTORY_KEY)
            .ok()
            .flatten()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    /// Record a successfully displayed city: overwrite the last city,
    /// move-or-insert it at the front of the list, truncate to
    /// [`MAX_HISTORY_ITEMS`]. Persistence failures are swallowed.
    pub fn record_city(&self, city: &CityRecord) {
        let _ = self.try_record(city, Utc::now());
    }

    fn try_record(&self, city: &CityRecord, now: DateTime<Utc>) -> Result<()> {
        self.storage.set(LAST_CITY_KEY, &city.full_name)?;

        let mut history = self.history();
        history.retain(|entry| entry.full_name != city.full_name);
        history.insert(
            0,
            RecentCity {
                name: city.name.clone(),
                region: city.region.clone(),
                country: city.country.clone(),
                full_name: city.full_name.clone(),
                timestamp: now,
            },
        );
        history.truncate(MAX_HISTORY_ITEMS);

        let encoded =
            serde_json::to_string(&history).context("Failed to serialize city history")?;
        self.storage.set(CITY_HISTORY_KEY, &encoded)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> CityRecord {
        CityRecord {
            name: name.to_string(),
            region: None,
            country: None,
            full_name: name.to_string(),
        }
    }

    fn store() -> HistoryStore<MemoryStorage> {
        HistoryStore::new(MemoryStorage::default())
    }

    #[test]
    fn last_city_absent_when_never_set() {
        assert_eq!(store().last_city(), None);
    }

    #[test]
    fn last_city_tracks_most_recent_record() {
        let store = store();
        store.record_city(&record("Paris"));
        store.record_city(&record("Lyon"));

        assert_eq!(store.last_city(), Some("Lyon".to_string()));
    }

    #[test]
    fn history_never_exceeds_limit() {
        let store = store();
        for name in ["A", "B", "C", "D", "E", "F", "G"] {
            store.record_city(&record(name));
        }

        assert_eq!(store.history().len(), MAX_HISTORY_ITEMS);
    }

    #[test]
    fn history_is_most_recent_first() {
        let store = store();
        store.record_city(&record("Paris"));
        store.record_city(&record("Lyon"));
        store.record_city(&record("Nice"));

        let names: Vec<_> = store.history().into_iter().map(|c| c.full_name).collect();
        assert_eq!(names, ["Nice", "Lyon", "Paris"]);
    }

    #[test]
    fn duplicate_moves_to_front_without_growing() {
        let store = store();
        store.record_city(&record("Paris"));
        store.record_city(&record("Lyon"));
        store.record_city(&record("Paris"));

        let names: Vec<_> = store.history().into_iter().map(|c| c.full_name).collect();
        assert_eq!(names, ["Paris", "Lyon"]);
    }

    #[test]
    fn oldest_entry_is_evicted_at_capacity() {
        let store = store();
        store.record_city(&CityRecord {
            name: "Paris".to_string(),
            region: Some("Île-de-France".to_string()),
            country: Some("France".to_string()),
            full_name: "Paris, Île-de-France, France".to_string(),
        });
        for name in ["Lyon", "Nice", "Lille", "Brest", "Dijon"] {
            store.record_city(&record(name));
        }

        let history = store.history();
        assert_eq!(history.len(), MAX_HISTORY_ITEMS);
        assert!(history.iter().all(|c| c.full_name != "Paris, Île-de-France, France"));
        assert_eq!(history[0].full_name, "Dijon");
    }

    #[test]
    fn corrupt_history_reads_as_empty() {
        let storage = MemoryStorage::default();
        storage.set(CITY_HISTORY_KEY, "{not json").expect("memory set must succeed");

        let store = HistoryStore::new(storage);
        assert!(store.history().is_empty());
    }

    #[test]
    fn recording_over_corrupt_history_starts_fresh() {
        let storage = MemoryStorage::default();
        storage.set(CITY_HISTORY_KEY, "[[[").expect("memory set must succeed");

        let store = HistoryStore::new(storage);
        store.record_city(&record("Oslo"));

        let names: Vec<_> = store.history().into_iter().map(|c| c.full_name).collect();
        assert_eq!(names, ["Oslo"]);
    }

    #[test]
    fn failing_storage_is_swallowed() {
        #[derive(Debug)]
        struct FailingStorage;

        impl Storage for FailingStorage {
            fn get(&self, _key: &str) -> Result<Option<String>> {
                Err(anyhow!("storage unavailable"))
            }
            fn set(&self, _key: &str, _value: &str) -> Result<()> {
                Err(anyhow!("storage unavailable"))
            }
        }

        let store = HistoryStore::new(FailingStorage);
        store.record_city(&record("Paris"));

        assert_eq!(store.last_city(), None);
        assert!(store.history().is_empty());
    }

    #[test]
    fn file_storage_round_trips_through_disk() {
        let dir = std::env::temp_dir().join(format!("meteo-history-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);

        let store = HistoryStore::new(FileStorage::at(dir.clone()));
        store.record_city(&record("Reykjavík"));

        let reopened = HistoryStore::new(FileStorage::at(dir.clone()));
        assert_eq!(reopened.last_city(), Some("Reykjavík".to_string()));
        assert_eq!(reopened.history().len(), 1);

        let _ = fs::remove_dir_all(&dir);
    }
}
