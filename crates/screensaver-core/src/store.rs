//! Persistent parameter store.
//!
//! A flat string-keyed store shared by every component. Keys follow the
//! scheme the page has always used, so existing `localStorage` contents keep
//! working:
//!
//! | key | value |
//! |-----|-------|
//! | `screensaver-<kind>-<param>` | scalar value |
//! | `screensaver-<kind>-colors` | JSON array of colors |
//! | `screensaver-<kind>-<param>_enabled` | `"true"` / `"false"` |
//! | `selectedScreensaver` | active kind |
//!
//! Writes go straight to the backend. When the backend refuses, the value is
//! kept in a session-only overlay so the UI keeps working until reload.

use crate::error::StoreError;
use crate::sequence::ColorSequence;
use std::collections::HashMap;
use std::sync::Mutex;

/// Key holding the active screensaver kind.
pub const SELECTED_KEY: &str = "selectedScreensaver";
/// Key holding the brightness adjustment in [-100, 100].
pub const BRIGHTNESS_VALUE_KEY: &str = "brightness-value";
/// Key holding whether the brightness adjustment is applied.
pub const BRIGHTNESS_SWITCH_KEY: &str = "brightness-switch-enabled";

const KEY_PREFIX: &str = "screensaver";

/// Storage key of a scalar parameter.
#[must_use]
pub fn param_key(kind: &str, name: &str) -> String {
    format!("{KEY_PREFIX}-{kind}-{name}")
}

/// Storage key of a kind's color sequence.
#[must_use]
pub fn colors_key(kind: &str) -> String {
    param_key(kind, "colors")
}

/// Storage key of the enable toggle paired with a single-choice parameter.
#[must_use]
pub fn enabled_key(kind: &str, name: &str) -> String {
    param_key(kind, &format!("{name}_enabled"))
}

/// Raw key/value backend (browser `localStorage`, memory, ...).
pub trait StorageBackend {
    /// Read a key.
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a key. Must be durable when it returns `Ok`.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-memory backend for tests and non-browser hosts.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    memory: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    /// Create an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend pre-filled with entries.
    #[must_use]
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            memory: Mutex::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

impl StorageBackend for MemoryBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .memory
            .lock()
            .map_err(|_| StoreError::AccessDenied)?
            .get(key)
            .cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.memory
            .lock()
            .map_err(|_| StoreError::AccessDenied)?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Backend standing in for storage that does not exist (private browsing,
/// sandboxed frames). Every operation fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableBackend;

impl StorageBackend for UnavailableBackend {
    fn get_item(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::NotAvailable)
    }

    fn set_item(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::NotAvailable)
    }
}

/// The parameter store every component reads and writes through.
pub struct ParameterStore {
    backend: Box<dyn StorageBackend>,
    /// Values the backend refused, kept for the rest of the session
    session: Mutex<HashMap<String, String>>,
}

impl std::fmt::Debug for ParameterStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParameterStore").finish_non_exhaustive()
    }
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl ParameterStore {
    /// Wrap a backend.
    #[must_use]
    pub fn new(backend: impl StorageBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            session: Mutex::new(HashMap::new()),
        }
    }

    /// Store backed by process memory only.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    /// Read a raw key. Backend failures fall back to the session overlay.
    #[must_use]
    pub fn get_raw(&self, key: &str) -> Option<String> {
        if let Some(value) = self.session.lock().ok().and_then(|s| s.get(key).cloned()) {
            return Some(value);
        }
        match self.backend.get_item(key) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("reading {key} failed, using defaults: {e}");
                None
            }
        }
    }

    /// Write a raw key. Backend failures keep the value for this session only.
    pub fn set_raw(&self, key: &str, value: &str) {
        match self.backend.set_item(key, value) {
            Ok(()) => {
                if let Ok(mut session) = self.session.lock() {
                    session.remove(key);
                }
            }
            Err(e) => {
                log::warn!("persisting {key} failed, keeping it for this session: {e}");
                if let Ok(mut session) = self.session.lock() {
                    session.insert(key.to_string(), value.to_string());
                }
            }
        }
    }

    /// Stored value of `(kind, name)`, or `default` when absent.
    #[must_use]
    pub fn get(&self, kind: &str, name: &str, default: &str) -> String {
        self.get_raw(&param_key(kind, name))
            .unwrap_or_else(|| default.to_string())
    }

    /// Persist `(kind, name)`.
    pub fn set(&self, kind: &str, name: &str, value: &str) {
        self.set_raw(&param_key(kind, name), value);
    }

    /// Stored enable toggle of a single-choice parameter.
    #[must_use]
    pub fn get_enabled(&self, kind: &str, name: &str, default: bool) -> bool {
        self.get_raw(&enabled_key(kind, name))
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(default)
    }

    /// Persist the enable toggle of a single-choice parameter.
    pub fn set_enabled(&self, kind: &str, name: &str, enabled: bool) {
        self.set_raw(&enabled_key(kind, name), if enabled { "true" } else { "false" });
    }

    /// Stored color sequence of `kind`.
    ///
    /// Missing, malformed or empty JSON yields `default`.
    #[must_use]
    pub fn get_color_sequence(&self, kind: &str, default: &ColorSequence) -> ColorSequence {
        let key = colors_key(kind);
        let Some(raw) = self.get_raw(&key) else {
            return default.clone();
        };
        match serde_json::from_str::<ColorSequence>(&raw) {
            Ok(sequence) => sequence,
            Err(e) => {
                log::warn!("discarding malformed color list under {key}: {e}");
                default.clone()
            }
        }
    }

    /// Persist the color sequence of `kind` as a JSON array.
    pub fn set_color_sequence(&self, kind: &str, sequence: &ColorSequence) {
        match serde_json::to_string(sequence) {
            Ok(json) => self.set_raw(&colors_key(kind), &json),
            Err(e) => log::warn!("serializing colors for {kind} failed: {e}"),
        }
    }
}
