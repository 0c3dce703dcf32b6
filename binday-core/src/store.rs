//! Persistence of the chosen address between runs.

use std::sync::Arc;

use crate::model::Address;
use crate::ports::PreferenceStore;

const SELECTED_ADDRESS_KEY: &str = "bin_collection_selected_address";
const LAST_POSTCODE_KEY: &str = "bin_collection_last_postcode";

#[derive(Clone)]
/// Best-effort persistence for the selected address and last postcode.
///
/// Store failures never propagate; a lost write only means the user has to
/// pick their address again next run.
pub struct SelectionStore {
    prefs: Arc<dyn PreferenceStore>,
}

impl SelectionStore {
    /// Wrap a scoped preference store.
    #[must_use]
    pub fn new(prefs: Arc<dyn PreferenceStore>) -> Self {
        Self { prefs }
    }

    /// Persist the picked address, overwriting any previous selection.
    pub async fn save(&self, address: &Address) {
        let payload = match serde_json::to_string(address) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::warn!(error = %err, "failed to serialize selected address");
                return;
            }
        };
        if let Err(err) = self.prefs.set(SELECTED_ADDRESS_KEY, &payload).await {
            tracing::warn!(error = %err, "failed to persist selected address");
        }
    }

    /// Load the previously picked address, if any.
    ///
    /// A missing key and an unreadable payload both count as no selection.
    pub async fn load(&self) -> Option<Address> {
        let raw = match self.prefs.get(SELECTED_ADDRESS_KEY).await {
            Ok(raw) => raw?,
            Err(err) => {
                tracing::warn!(error = %err, "failed to read selected address");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(address) => Some(address),
            Err(err) => {
                tracing::warn!(error = %err, "stored address is not valid JSON, ignoring");
                None
            }
        }
    }

    /// Remember the postcode the user last searched with.
    pub async fn save_postcode(&self, postcode: &str) {
        if let Err(err) = self.prefs.set(LAST_POSTCODE_KEY, postcode).await {
            tracing::warn!(error = %err, "failed to persist last postcode");
        }
    }

    /// Restore the last searched postcode, if any.
    pub async fn load_postcode(&self) -> Option<String> {
        match self.prefs.get(LAST_POSTCODE_KEY).await {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(error = %err, "failed to read last postcode");
                None
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::ports::{PreferenceStore, StoreError};

    /// In-memory preference store shared by the unit tests.
    #[derive(Default)]
    pub(crate) struct MemoryPrefs {
        values: Mutex<HashMap<String, String>>,
    }

    impl MemoryPrefs {
        pub(crate) fn insert(&self, key: &str, value: &str) {
            self.values
                .lock()
                .expect("prefs lock")
                .insert(key.to_owned(), value.to_owned());
        }
    }

    #[async_trait]
    impl PreferenceStore for MemoryPrefs {
        async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            Ok(self.values.lock().expect("prefs lock").get(key).cloned())
        }

        async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
            self.values
                .lock()
                .expect("prefs lock")
                .insert(key.to_owned(), value.to_owned());
            Ok(())
        }
    }
}
