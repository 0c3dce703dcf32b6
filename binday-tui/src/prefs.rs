//! JSON-file preference store backing the selection persistence.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use binday_core::ports::{PreferenceStore, StoreError};

/// Directory holding preferences and the log file.
pub(crate) fn config_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")?;
    Ok(PathBuf::from(home).join(".config").join("binday"))
}

/// Default location of the preferences file.
pub(crate) fn default_path() -> anyhow::Result<PathBuf> {
    Ok(config_dir()?.join("preferences.json"))
}

/// Preferences kept as a flat JSON object on disk.
///
/// A missing or unreadable file behaves as an empty store; the selection
/// layer above treats that as "nothing saved yet".
pub(crate) struct FilePreferences {
    path: PathBuf,
    // Guards the read-modify-write cycle on the backing file.
    lock: Mutex<()>,
}

impl FilePreferences {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    fn read_map(&self) -> HashMap<String, String> {
        let Ok(raw) = std::fs::read_to_string(&self.path) else {
            return HashMap::new();
        };
        serde_json::from_str(&raw).unwrap_or_default()
    }
}

#[async_trait]
impl PreferenceStore for FilePreferences {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let _guard = self.lock.lock().expect("preferences lock");
        Ok(self.read_map().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().expect("preferences lock");
        let mut map = self.read_map();
        map.insert(key.to_owned(), value.to_owned());

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|err| StoreError(err.to_string()))?;
        }
        let payload =
            serde_json::to_string_pretty(&map).map_err(|err| StoreError(err.to_string()))?;
        std::fs::write(&self.path, payload).map_err(|err| StoreError(err.to_string()))?;
        Ok(())
    }
}
