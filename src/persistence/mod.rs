//! Key/value persistence
//!
//! Stats and settings are small JSON blobs under fixed keys. The browser build
//! keeps them in LocalStorage; native runs and tests use an in-memory map.

use std::collections::BTreeMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::StorageError;

#[cfg(target_arch = "wasm32")]
mod local;
#[cfg(target_arch = "wasm32")]
pub use local::LocalStore;

/// Minimal string store (LocalStorage shaped)
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Process-local store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Read and decode a value. `Ok(None)` when the key is absent.
pub fn load_json<T, S>(store: &S, key: &str) -> Result<Option<T>, StorageError>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    match store.get_item(key)? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

/// Encode and write a value
pub fn save_json<T, S>(store: &mut S, key: &str, value: &T) -> Result<(), StorageError>
where
    T: Serialize,
    S: KeyValueStore + ?Sized,
{
    let json = serde_json::to_string(value)?;
    store.set_item(key, &json)
}

/// Load a value, falling back to its default on a missing key or any error
pub fn load_or_default<T, S>(store: &S, key: &str) -> T
where
    T: DeserializeOwned + Default,
    S: KeyValueStore + ?Sized,
{
    match load_json(store, key) {
        Ok(Some(value)) => value,
        Ok(None) => {
            log::info!("No saved data under {}, using defaults", key);
            T::default()
        }
        Err(err) => {
            log::warn!("Discarding unreadable {}: {}", key, err);
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Blob {
        n: u32,
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert!(load_json::<Blob, _>(&store, "k").unwrap().is_none());
        save_json(&mut store, "k", &Blob { n: 7 }).unwrap();
        assert_eq!(load_json::<Blob, _>(&store, "k").unwrap(), Some(Blob { n: 7 }));
        assert_eq!(store.get_item("k").unwrap().as_deref(), Some(r#"{"n":7}"#));
    }

    #[test]
    fn test_corrupt_blob_falls_back_to_default() {
        let mut store = MemoryStore::new();
        store.set_item("k", "{not json").unwrap();
        assert!(matches!(
            load_json::<Blob, _>(&store, "k"),
            Err(StorageError::Json(_))
        ));
        let blob: Blob = load_or_default(&store, "k");
        assert_eq!(blob, Blob::default());
    }
}
