//! Per-origin token storage.

use dashmap::DashMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("storage quota exceeded")]
    QuotaExceeded,
}

/// Key/value storage private to one origin.
pub trait TokenStore: Send + Sync + std::fmt::Debug {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-process store; one instance stands for one origin.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    entries: DashMap<String, String>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).map(|r| r.value().clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Store for contexts with no per-origin storage (server-side handlers).
///
/// Reads find nothing and writes are dropped, so the cookie is the only carrier.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocalStore;

impl TokenStore for NoLocalStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Ok(())
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Ok(())
    }
}
