//! `localStorage` backend for the parameter store.

use screensaver_core::{StorageBackend, StoreError};

/// Browser `localStorage`.
///
/// Private browsing modes may refuse access or throw on write; both surface
/// as [`StoreError`] and the store falls back to session memory.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Result<web_sys::Storage, StoreError> {
        let window = web_sys::window().ok_or(StoreError::NotAvailable)?;
        window
            .local_storage()
            .map_err(|_| StoreError::AccessDenied)?
            .ok_or(StoreError::NotAvailable)
    }
}

impl StorageBackend for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Self::storage()?
            .get_item(key)
            .map_err(|_| StoreError::AccessDenied)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|_| StoreError::QuotaExceeded)
    }
}
