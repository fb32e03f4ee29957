use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use sweeper_core::Snapshot;
use thiserror::Error;

/// Saves older than this are treated as if they were never written.
pub const SAVE_EXPIRY_DAYS: i64 = 31;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Could not access the save file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Save file is malformed: {0}")]
    Format(#[from] serde_json::Error),
}

pub trait StorageKey {
    const KEY: &'static str;
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedGame {
    pub key: String,
    pub saved_at: DateTime<Utc>,
    pub snapshot: Snapshot,
}

impl StorageKey for SavedGame {
    const KEY: &'static str = "sweeper:game:v1";
}

impl SavedGame {
    fn new(snapshot: &Snapshot, now: DateTime<Utc>) -> Self {
        Self {
            key: Self::KEY.to_owned(),
            saved_at: now,
            snapshot: snapshot.clone(),
        }
    }

    /// The snapshot, unless the save is stale or belongs to another format.
    fn into_fresh(self, now: DateTime<Utc>) -> Option<Snapshot> {
        if self.key != Self::KEY {
            log::warn!("Ignoring save with unknown key {:?}", self.key);
            return None;
        }
        if now - self.saved_at > TimeDelta::days(SAVE_EXPIRY_DAYS) {
            log::info!("Ignoring save from {}, it has expired", self.saved_at);
            return None;
        }
        Some(self.snapshot)
    }
}

/// Where saved boards go between sessions.
pub trait SnapshotStore {
    fn save(&mut self, snapshot: &Snapshot, now: DateTime<Utc>) -> Result<(), StoreError>;

    fn load(&self, now: DateTime<Utc>) -> Result<Option<Snapshot>, StoreError>;

    fn has_saved(&self, now: DateTime<Utc>) -> bool {
        matches!(self.load(now), Ok(Some(_)))
    }
}

/// Keeps one saved game as a JSON document on disk.
#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SnapshotStore for FileStore {
    fn save(&mut self, snapshot: &Snapshot, now: DateTime<Utc>) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(&SavedGame::new(snapshot, now))?;
        fs::write(&self.path, json)?;
        log::debug!("Saved game to {}", self.path.display());
        Ok(())
    }

    fn load(&self, now: DateTime<Utc>) -> Result<Option<Snapshot>, StoreError> {
        let json = match fs::read(&self.path) {
            Ok(json) => json,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let saved: SavedGame = serde_json::from_slice(&json)?;
        Ok(saved.into_fresh(now))
    }
}

/// Keeps the saved game in memory only.
#[cfg(test)]
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    saved: Option<SavedGame>,
}

#[cfg(test)]
impl SnapshotStore for MemoryStore {
    fn save(&mut self, snapshot: &Snapshot, now: DateTime<Utc>) -> Result<(), StoreError> {
        self.saved = Some(SavedGame::new(snapshot, now));
        Ok(())
    }

    fn load(&self, now: DateTime<Utc>) -> Result<Option<Snapshot>, StoreError> {
        Ok(self.saved.clone().and_then(|saved| saved.into_fresh(now)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t0() -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp_millis(0).unwrap()
    }

    fn snapshot() -> Snapshot {
        Snapshot {
            size: 8,
            mine_positions: vec![1, 2],
            clearable_positions: (3..=64).collect(),
            revealed_positions: vec![10],
        }
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("sweeper-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn file_store_round_trip() {
        let path = temp_path("round-trip");
        let mut store = FileStore::new(&path);

        assert!(!store.has_saved(t0()));
        store.save(&snapshot(), t0()).unwrap();

        assert_eq!(store.load(t0()).unwrap(), Some(snapshot()));
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn file_store_reports_malformed_saves() {
        let path = temp_path("malformed");
        fs::write(&path, b"{\"key\": \"sweeper:game:v1\"").unwrap();

        let result = FileStore::new(&path).load(t0());

        assert!(matches!(result, Err(StoreError::Format(_))));
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn saves_expire_after_a_month() {
        let mut store = MemoryStore::default();
        store.save(&snapshot(), t0()).unwrap();

        let day_30 = t0() + TimeDelta::days(30);
        let day_32 = t0() + TimeDelta::days(32);

        assert!(store.has_saved(day_30));
        assert_eq!(store.load(day_32).unwrap(), None);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let mut saved = SavedGame::new(&snapshot(), t0());
        saved.key = "sweeper:game:v0".to_owned();

        assert_eq!(saved.into_fresh(t0()), None);
    }

    #[test]
    fn storage_key_is_versioned() {
        assert_eq!(<SavedGame as StorageKey>::KEY, "sweeper:game:v1");
    }
}
