//! Persisted widget preferences and their storage backends.

use std::fs;
use std::path::{Path, PathBuf};

use folio_core::StorageError;
use folio_weather::{Theme, Units};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Length cap of the recent-city list
pub const MAX_RECENT_CITIES: usize = 8;

/// Everything the widget remembers between visits.
///
/// Serialized with the keys `units`, `theme`, `lastQuery`, `recentCities`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default)]
    pub units: Units,
    #[serde(default)]
    pub theme: Theme,
    /// Last place name that resolved successfully; empty when none
    #[serde(default)]
    pub last_query: String,
    /// Most recent first, unique ignoring case
    #[serde(default)]
    pub recent_cities: Vec<String>,
}

impl Preferences {
    /// Move `city` to the front of the recent list, dropping any entry that
    /// differs only in case, and evict beyond the cap.
    pub fn remember_city(&mut self, city: &str) {
        let key = city.to_lowercase();
        self.recent_cities.retain(|c| c.to_lowercase() != key);
        self.recent_cities.insert(0, city.to_string());
        self.recent_cities.truncate(MAX_RECENT_CITIES);
    }

    pub fn last_query(&self) -> Option<&str> {
        Some(self.last_query.as_str()).filter(|q| !q.trim().is_empty())
    }

    /// Repair a list loaded from disk: drop blanks and case duplicates, cap it.
    fn normalized(mut self) -> Self {
        let mut seen = std::collections::HashSet::new();
        self.recent_cities
            .retain(|c| !c.trim().is_empty() && seen.insert(c.to_lowercase()));
        self.recent_cities.truncate(MAX_RECENT_CITIES);
        self
    }
}

/// Load/save collaborator for `Preferences`
pub trait PreferenceStore {
    fn load(&self) -> Result<Preferences, StorageError>;
    fn save(&self, prefs: &Preferences) -> Result<(), StorageError>;
}

/// Preferences kept as a JSON document on disk
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for JsonFileStore {
    fn load(&self) -> Result<Preferences, StorageError> {
        if !self.path.exists() {
            tracing::debug!("No preferences at {:?}, using defaults", self.path);
            return Ok(Preferences::default());
        }

        let json = fs::read_to_string(&self.path).map_err(|e| StorageError::Read(e.to_string()))?;

        let prefs: Preferences =
            serde_json::from_str(&json).map_err(|e| StorageError::Corrupt(e.to_string()))?;

        Ok(prefs.normalized())
    }

    fn save(&self, prefs: &Preferences) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StorageError::Write(e.to_string()))?;
        }

        let json =
            serde_json::to_string_pretty(prefs).map_err(|e| StorageError::Write(e.to_string()))?;

        fs::write(&self.path, json).map_err(|e| StorageError::Write(e.to_string()))?;

        tracing::debug!("Saved preferences to {:?}", self.path);
        Ok(())
    }
}

/// In-process store, used by tests and one-shot runs
#[derive(Debug, Default)]
pub struct MemoryStore {
    prefs: Mutex<Preferences>,
}

impl MemoryStore {
    pub fn new(prefs: Preferences) -> Self {
        Self {
            prefs: Mutex::new(prefs),
        }
    }

    /// What a fresh `load()` would return
    pub fn snapshot(&self) -> Preferences {
        self.prefs.lock().clone()
    }
}

impl PreferenceStore for MemoryStore {
    fn load(&self) -> Result<Preferences, StorageError> {
        Ok(self.snapshot())
    }

    fn save(&self, prefs: &Preferences) -> Result<(), StorageError> {
        *self.prefs.lock() = prefs.clone();
        Ok(())
    }
}
