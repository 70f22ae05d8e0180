use serde::Serialize;
use serde::de::DeserializeOwned;
use std::cell::RefCell;
use std::collections::HashMap;
use thiserror::Error;
use tracing::warn;

pub const CART_KEY: &str = "rrd_cart_v1";
pub const CURRENCY_KEY: &str = "rrd_currency";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage quota exceeded while writing '{key}'")]
    QuotaExceeded { key: String },
    #[error("failed to serialize '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Client-local string key-value storage (the browser's `localStorage` shape).
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Read and decode a JSON entry, keeping "absent" apart from "unreadable".
///
/// A backend failure is returned as an error. An undecodable value is
/// logged and treated as absent.
pub fn try_load_json<T, S>(store: &S, key: &str) -> Result<Option<T>, StorageError>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(err) => {
            warn!("discarding unreadable '{}' entry: {}", key, err);
            Ok(None)
        }
    }
}

pub fn save_json<T, S>(store: &S, key: &str, value: &T) -> Result<(), StorageError>
where
    T: Serialize,
    S: KeyValueStore + ?Sized,
{
    let raw = serde_json::to_string(value).map_err(|source| StorageError::Serialize {
        key: key.to_owned(),
        source,
    })?;
    store.set(key, &raw)
}

/// Map-backed store with an optional byte quota, used off-browser and in tests.
#[derive(Default)]
pub struct InMemoryStore {
    entries: RefCell<HashMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: RefCell::new(HashMap::new()),
            quota_bytes: Some(quota_bytes),
        }
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn used_bytes_without(&self, key: &str) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(quota) = self.quota_bytes {
            if self.used_bytes_without(key) + key.len() + value.len() > quota {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_owned(),
                });
            }
        }
        self.entries
            .borrow_mut()
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Entry {
        name: String,
        count: u32,
    }

    #[test]
    fn json_roundtrip_through_memory_store() -> anyhow::Result<()> {
        let store = InMemoryStore::new();
        let entry = Entry {
            name: "bol".into(),
            count: 3,
        };

        save_json(&store, "entry", &entry)?;
        let loaded: Option<Entry> = try_load_json(&store, "entry")?;

        assert_eq!(loaded, Some(entry));
        Ok(())
    }

    #[test]
    fn corrupt_entry_loads_as_none() -> anyhow::Result<()> {
        let store = InMemoryStore::new();
        store.set("entry", "{not json")?;

        let loaded: Option<Entry> = try_load_json(&store, "entry")?;
        assert!(loaded.is_none());
        assert_eq!(store.raw("entry").as_deref(), Some("{not json"));
        Ok(())
    }

    #[test]
    fn quota_rejects_write_and_keeps_previous_value() -> anyhow::Result<()> {
        let store = InMemoryStore::with_quota(16);
        store.set("k", "small")?;

        let err = store.set("k", "this value is far too long").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { .. }));
        assert_eq!(store.get("k")?.as_deref(), Some("small"));
        Ok(())
    }

    struct BrokenReads;

    impl KeyValueStore for BrokenReads {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Backend("read refused".into()))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Ok(())
        }
    }

    #[test]
    fn failed_read_is_an_error_not_an_absent_entry() {
        let err = try_load_json::<Entry, _>(&BrokenReads, "entry").unwrap_err();
        assert!(matches!(err, StorageError::Backend(_)));
    }
}
