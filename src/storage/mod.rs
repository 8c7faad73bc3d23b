//! Session Storage Abstraction
//!
//! Information Hiding:
//! - Storage backend implementation details hidden behind trait
//! - Allows swapping between memory and filesystem without touching the composer
//! - Values are arbitrary JSON; keys are generated or caller-supplied strings

use crate::config::{StorageBackend, StorageConfig};
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

pub mod filesystem;
pub mod memory;

pub use filesystem::FileSystemStore;
pub use memory::InMemoryStore;

/// Key-value store for session records.
/// Writes to an existing key replace the previous value.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn put(&self, key: &str, value: Value) -> Result<()>;

    /// Returns `None` if the key was never stored or has been deleted
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Returns whether a record was removed
    async fn delete(&self, key: &str) -> Result<bool>;

    async fn keys(&self) -> Result<Vec<String>>;
}

/// Build the backend selected in configuration.
pub async fn from_config(config: &StorageConfig) -> Result<Arc<dyn SessionStore>> {
    match config.backend {
        StorageBackend::Memory => {
            tracing::info!("using in-memory session store");
            Ok(Arc::new(InMemoryStore::new()))
        }
        StorageBackend::Filesystem => {
            tracing::info!("using filesystem session store at {:?}", config.path);
            Ok(Arc::new(FileSystemStore::new(config.path.clone()).await?))
        }
    }
}

static KEY_SEQUENCE: AtomicU64 = AtomicU64::new(0);

pub fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// `<prefix>_<unix seconds>_<sequence>`; unique within the process.
pub fn generate_key(prefix: &str) -> String {
    let sequence = KEY_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{}_{}_{}", prefix, unix_timestamp(), sequence)
}
