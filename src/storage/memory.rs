//! In-Memory Session Storage
//!
//! Information Hiding:
//! - HashMap storage structure hidden from users
//! - Thread-safe access via RwLock hidden behind async interface
//! - Unbounded and lost when the process exits

use super::SessionStore;
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

pub struct InMemoryStore {
    records: Arc<RwLock<HashMap<String, Value>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemoryStore {
    async fn put(&self, key: &str, value: Value) -> Result<()> {
        let mut records = self.records.write().await;
        if records.insert(key.to_string(), value).is_some() {
            tracing::debug!("[InMemoryStore] Overwrote record '{}'", key);
        } else {
            tracing::debug!("[InMemoryStore] Stored record '{}'", key);
        }
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let records = self.records.read().await;
        Ok(records.get(key).cloned())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let mut records = self.records.write().await;
        let removed = records.remove(key).is_some();
        tracing::debug!("[InMemoryStore] Delete '{}' (existed: {})", key, removed);
        Ok(removed)
    }

    async fn keys(&self) -> Result<Vec<String>> {
        let records = self.records.read().await;
        Ok(records.keys().cloned().collect())
    }
}
