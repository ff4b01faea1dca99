//! Persisted player state
//!
//! A single JSON record under a fixed key. Reading is forgiving: anything
//! missing, unreadable or malformed yields the default record.

use crate::error::PersistError;
use crate::strategy::StrategyKind;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

/// Key the player state is stored under
pub const STATE_KEY: &str = "waveplay-state";

/// State restored on startup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PersistedState {
    /// Id of the track that was current
    pub current_id: Option<String>,

    /// Active strategy; unknown names read back as sequential
    #[serde(deserialize_with = "lenient_strategy")]
    pub strategy: StrategyKind,
}

fn lenient_strategy<'de, D>(deserializer: D) -> Result<StrategyKind, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value
        .as_str()
        .and_then(|name| name.parse().ok())
        .unwrap_or_default())
}

impl PersistedState {
    /// Parse a stored record, falling back to defaults on any problem
    pub fn decode(raw: &str) -> Self {
        match serde_json::from_str::<Option<Self>>(raw) {
            Ok(state) => state.unwrap_or_default(),
            Err(error) => {
                warn!(%error, "discarding malformed player state");
                Self::default()
            }
        }
    }

    pub fn encode(&self) -> Result<String, PersistError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Key-value storage for serialized records
pub trait StateStore: Send + Sync {
    /// `Ok(None)` when nothing is stored under `key`
    fn read(&self, key: &str) -> io::Result<Option<String>>;

    fn write(&self, key: &str, value: &str) -> io::Result<()>;
}

/// One `<key>.json` file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStateStore {
    dir: PathBuf,
}

impl FileStateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StateStore for FileStateStore {
    fn read(&self, key: &str) -> io::Result<Option<String>> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error),
        }
    }

    fn write(&self, key: &str, value: &str) -> io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path_for(key), value)
    }
}

/// Process-local store
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStateStore {
    fn read(&self, key: &str) -> io::Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| io::Error::other("state store lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> io::Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| io::Error::other("state store lock poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Read the persisted state; never fails
pub fn load_state(store: &dyn StateStore) -> PersistedState {
    match store.read(STATE_KEY) {
        Ok(Some(raw)) => PersistedState::decode(&raw),
        Ok(None) => {
            debug!("no persisted player state");
            PersistedState::default()
        }
        Err(error) => {
            warn!(%error, "failed to read player state");
            PersistedState::default()
        }
    }
}

pub fn save_state(store: &dyn StateStore, state: &PersistedState) -> Result<(), PersistError> {
    store.write(STATE_KEY, &state.encode()?)?;
    Ok(())
}
