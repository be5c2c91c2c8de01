//! Web-specific engine pieces
//!
//! Provides the `localStorage` save store and re-exports the core game types.

use web_sys::Storage;

// Re-export all types from bowhunter-game
pub use bowhunter_game::*;

#[derive(Debug, thiserror::Error)]
pub enum WebStorageError {
    #[error("localStorage is not available")]
    Unavailable,
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Save store backed by the page's `localStorage`.
#[derive(Debug, Clone)]
pub struct LocalStorageStore {
    storage: Storage,
}

impl LocalStorageStore {
    /// Wrap an existing storage handle.
    #[must_use]
    pub const fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// The current window's `localStorage`.
    ///
    /// # Errors
    ///
    /// Returns [`WebStorageError::Unavailable`] outside a browser window or
    /// when storage access is blocked.
    pub fn from_window() -> Result<Self, WebStorageError> {
        web_sys::window()
            .and_then(|win| win.local_storage().ok().flatten())
            .map(Self::new)
            .ok_or(WebStorageError::Unavailable)
    }
}

impl SaveStore for LocalStorageStore {
    type Error = WebStorageError;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        self.storage
            .get_item(key)
            .map_err(|e| WebStorageError::Storage(format!("{e:?}")))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.storage
            .set_item(key, value)
            .map_err(|e| WebStorageError::Storage(format!("{e:?}")))
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        self.storage
            .remove_item(key)
            .map_err(|e| WebStorageError::Storage(format!("{e:?}")))
    }
}
