//! # Browser `localStorage` store
//!
//! [`LocalStore`] is the [`KeyValueStore`] used on the **web platform**. It
//! persists the session and cart into `window.localStorage` through
//! [`web_sys::Storage`], so both survive page reloads within one browser.
//!
//! ## Connection management
//!
//! `LocalStore` is a zero-size, `Copy` handle that looks up
//! `window.localStorage` on every call. The lookup can fail at any time (private
//! browsing modes, storage disabled by policy), and a fresh lookup lets a later
//! call succeed once storage is available again.
//!
//! ## Error mapping
//!
//! | Browser condition | [`StorageError`] |
//! |-------------------|------------------|
//! | no `window` / `localStorage` is `null` or throws | `Unavailable` |
//! | `QuotaExceededError` on write | `QuotaExceeded` |
//! | any other exception | `Unavailable` |

use wasm_bindgen::{JsCast, JsValue};
use web_sys::Storage;

use crate::kv::{KeyValueStore, StorageError};

/// `window.localStorage`-backed KeyValueStore.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStore;

impl LocalStore {
    pub fn new() -> Self {
        Self
    }

    fn storage(&self) -> Result<Storage, StorageError> {
        let window = web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("no window".to_string()))?;
        window
            .local_storage()
            .map_err(|e| StorageError::Unavailable(describe(&e)))?
            .ok_or_else(|| StorageError::Unavailable("localStorage is disabled".to_string()))
    }
}

fn describe(value: &JsValue) -> String {
    match value.dyn_ref::<web_sys::DomException>() {
        Some(exception) => format!("{}: {}", exception.name(), exception.message()),
        None => format!("{value:?}"),
    }
}

fn is_quota_error(value: &JsValue) -> bool {
    value
        .dyn_ref::<web_sys::DomException>()
        .is_some_and(|exception| exception.name() == "QuotaExceededError")
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage()?
            .get_item(key)
            .map_err(|e| StorageError::Unavailable(describe(&e)))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage()?.set_item(key, value).map_err(|e| {
            if is_quota_error(&e) {
                StorageError::QuotaExceeded(key.to_string())
            } else {
                StorageError::Unavailable(describe(&e))
            }
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.storage()?
            .remove_item(key)
            .map_err(|e| StorageError::Unavailable(describe(&e)))
    }
}
