//! Key/value storage backends
//!
//! Saves are whole JSON documents stored under a string key. The browser
//! build uses LocalStorage; native builds write one `<key>.json` file per
//! key into a directory.

use std::collections::HashMap;

/// Errors from a storage backend
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// No backing store could be reached (e.g. LocalStorage disabled)
    #[error("storage unavailable")]
    Unavailable,

    /// Keys become file names, so separators and empty keys are rejected
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    #[error("I/O error for key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode save: {0}")]
    Encode(#[from] serde_json::Error),

    /// Error reported by the browser storage API
    #[error("browser storage error: {0}")]
    Browser(String),
}

/// Minimal key/value store
pub trait Storage {
    /// `Ok(None)` when the key has never been written
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    /// Removing a missing key is not an error
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

/// In-process storage (tests, headless runs)
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        validate_key(key)?;
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use std::fs;
    use std::io;
    use std::path::{Path, PathBuf};

    use super::{Storage, StorageError, validate_key};

    /// One JSON file per key inside `dir` (created on first write)
    #[derive(Debug, Clone)]
    pub struct FileStorage {
        dir: PathBuf,
    }

    impl FileStorage {
        pub fn new(dir: impl Into<PathBuf>) -> Self {
            Self { dir: dir.into() }
        }

        pub fn dir(&self) -> &Path {
            &self.dir
        }

        fn path(&self, key: &str) -> Result<PathBuf, StorageError> {
            validate_key(key)?;
            Ok(self.dir.join(format!("{key}.json")))
        }
    }

    fn io_error(key: &str, source: io::Error) -> StorageError {
        StorageError::Io {
            key: key.to_string(),
            source,
        }
    }

    impl Storage for FileStorage {
        fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
            match fs::read_to_string(self.path(key)?) {
                Ok(contents) => Ok(Some(contents)),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(io_error(key, e)),
            }
        }

        fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            let path = self.path(key)?;
            fs::create_dir_all(&self.dir).map_err(|e| io_error(key, e))?;

            // Write-then-rename so a crash never leaves a half-written save
            let tmp = path.with_extension("json.tmp");
            fs::write(&tmp, value).map_err(|e| io_error(key, e))?;
            fs::rename(&tmp, &path).map_err(|e| io_error(key, e))
        }

        fn remove(&mut self, key: &str) -> Result<(), StorageError> {
            match fs::remove_file(self.path(key)?) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(io_error(key, e)),
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::LocalStorage;

#[cfg(target_arch = "wasm32")]
mod web {
    use super::{Storage, StorageError, validate_key};

    /// Browser LocalStorage
    #[derive(Debug, Clone, Copy, Default)]
    pub struct LocalStorage;

    impl LocalStorage {
        fn backend() -> Result<web_sys::Storage, StorageError> {
            web_sys::window()
                .and_then(|w| w.local_storage().ok())
                .flatten()
                .ok_or(StorageError::Unavailable)
        }
    }

    fn browser_error(e: wasm_bindgen::JsValue) -> StorageError {
        StorageError::Browser(format!("{e:?}"))
    }

    impl Storage for LocalStorage {
        fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
            validate_key(key)?;
            Self::backend()?.get_item(key).map_err(browser_error)
        }

        fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            validate_key(key)?;
            Self::backend()?.set_item(key, value).map_err(browser_error)
        }

        fn remove(&mut self, key: &str) -> Result<(), StorageError> {
            validate_key(key)?;
            Self::backend()?.remove_item(key).map_err(browser_error)
        }
    }
}
