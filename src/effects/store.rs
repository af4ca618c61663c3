//! Key-value storage for the durable counters.

use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised by a [`CounterStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage file is malformed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("stored value {value:?} for {key} is not a counter")]
    InvalidValue { key: String, value: String },
}

/// The three durable counters and their storage keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CounterKey {
    HighScore,
    BestStreak,
    TotalPhotos,
}

impl CounterKey {
    pub const ALL: [CounterKey; 3] = [Self::HighScore, Self::BestStreak, Self::TotalPhotos];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::HighScore => "@TimeGuessr:highScore",
            Self::BestStreak => "@TimeGuessr:bestStreak",
            Self::TotalPhotos => "@TimeGuessr:totalPhotos",
        }
    }
}

/// Storage capability for the durable counters.
///
/// Values are kept as decimal strings. A missing key reads as `None`.
pub trait CounterStore: Send + Sync {
    fn read(&self, key: CounterKey) -> Result<Option<u32>, StoreError>;

    fn write(&self, key: CounterKey, value: u32) -> Result<(), StoreError>;
}

fn parse_counter(key: CounterKey, raw: &str) -> Result<u32, StoreError> {
    raw.trim()
        .parse()
        .map_err(|_| StoreError::InvalidValue {
            key: key.as_str().to_string(),
            value: raw.to_string(),
        })
}

/// Counters kept in memory only.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<&'static str, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw stored value, bypassing validation.
    pub fn insert_raw(&self, key: CounterKey, raw: impl Into<String>) {
        self.values.lock().insert(key.as_str(), raw.into());
    }
}

impl CounterStore for MemoryStore {
    fn read(&self, key: CounterKey) -> Result<Option<u32>, StoreError> {
        self.values
            .lock()
            .get(key.as_str())
            .map(|raw| parse_counter(key, raw))
            .transpose()
    }

    fn write(&self, key: CounterKey, value: u32) -> Result<(), StoreError> {
        self.values.lock().insert(key.as_str(), value.to_string());
        Ok(())
    }
}

/// Counters kept in a single JSON object file.
///
/// The file maps storage keys to string values and is rewritten on every
/// write. A missing file reads as empty.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(error) => Err(error.into()),
        }
    }
}

impl CounterStore for JsonFileStore {
    fn read(&self, key: CounterKey) -> Result<Option<u32>, StoreError> {
        let _guard = self.lock.lock();
        self.load()?
            .get(key.as_str())
            .map(|raw| parse_counter(key, raw))
            .transpose()
    }

    fn write(&self, key: CounterKey, value: u32) -> Result<(), StoreError> {
        let _guard = self.lock.lock();
        let mut values = self.load()?;
        values.insert(key.as_str().to_string(), value.to_string());
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(&values)?)?;
        Ok(())
    }
}
