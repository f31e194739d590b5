//! Settings persistence under a single well-known key

use std::{
    collections::BTreeMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Mutex,
};
use tracing::{debug, info, warn};

use crate::{error::SettingsStoreError, state::Settings};

/// Key under which the settings blob is stored
pub const SETTINGS_KEY: &str = "pomodoroSettings";

/// Storage backend for [`Settings`]. `Ok(None)` means nothing was saved yet.
pub trait SettingsStore: Send + Sync {
    fn load(&self) -> Result<Option<Settings>, SettingsStoreError>;
    fn save(&self, settings: &Settings) -> Result<(), SettingsStoreError>;
}

/// JSON file holding a flat object of string blobs
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/pomo-relay/settings.json`, or the working directory
    /// when the platform has no config dir
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pomo-relay")
            .join("settings.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, SettingsStoreError> {
        match fs::read_to_string(&self.path) {
            Ok(data) => Ok(serde_json::from_str(&data)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl SettingsStore for JsonFileStore {
    fn load(&self) -> Result<Option<Settings>, SettingsStoreError> {
        let entries = self.read_entries()?;
        let Some(blob) = entries.get(SETTINGS_KEY) else {
            debug!("No saved settings in {}", self.path.display());
            return Ok(None);
        };

        let settings: Settings = serde_json::from_str(blob)?;
        Ok(Some(settings.normalized()?))
    }

    fn save(&self, settings: &Settings) -> Result<(), SettingsStoreError> {
        // Keep unrelated keys intact; a corrupt file is replaced
        let mut entries = self.read_entries().unwrap_or_else(|e| {
            warn!("Discarding unreadable settings file {}: {}", self.path.display(), e);
            BTreeMap::new()
        });
        entries.insert(SETTINGS_KEY.to_string(), serde_json::to_string(settings)?);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&entries)?)?;

        info!("Settings saved to {}", self.path.display());
        Ok(())
    }
}

/// Store that keeps the blob in memory, used in tests and with `--no-persist`
#[derive(Debug, Default)]
pub struct MemoryStore {
    blob: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemoryStore {
    fn load(&self) -> Result<Option<Settings>, SettingsStoreError> {
        let blob = self
            .blob
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone());

        match blob {
            Some(blob) => {
                let settings: Settings = serde_json::from_str(&blob)?;
                Ok(Some(settings.normalized()?))
            }
            None => Ok(None),
        }
    }

    fn save(&self, settings: &Settings) -> Result<(), SettingsStoreError> {
        let blob = serde_json::to_string(settings)?;
        match self.blob.lock() {
            Ok(mut guard) => *guard = Some(blob),
            Err(poisoned) => *poisoned.into_inner() = Some(blob),
        }
        Ok(())
    }
}
