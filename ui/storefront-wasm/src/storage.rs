//! `localStorage` behind the storefront's key-value seam.

use rrd_storage::{InMemoryStore, KeyValueStore, StorageError};
use std::rc::Rc;

pub struct BrowserStorage {
    inner: web_sys::Storage,
}

impl BrowserStorage {
    pub fn open() -> Option<Self> {
        let inner = web_sys::window()?.local_storage().ok()??;
        Some(Self { inner })
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner
            .get_item(key)
            .map_err(|e| StorageError::Backend(format!("{e:?}")))
    }

    /// Browsers throw `QuotaExceededError` here; any throw is reported as such.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner
            .set_item(key, value)
            .map_err(|_| StorageError::QuotaExceeded { key: key.to_owned() })
    }
}

/// `localStorage` when the browser grants it (private modes may not),
/// otherwise an in-memory store that lasts for the page.
pub fn client_storage() -> Rc<dyn KeyValueStore> {
    match BrowserStorage::open() {
        Some(store) => Rc::new(store),
        None => {
            tracing::warn!("localStorage unavailable, cart will not survive a reload");
            Rc::new(InMemoryStore::new())
        }
    }
}
