//! # In-Memory Item Store
//!
//! The demo host's data store. Every operation reports itself to the
//! request's [`EventLog`] as a query, and reads also count as cache lookups,
//! which is what the queries and object cache panels display.

use debugbar_core::{EventLog, QueryRecord, StoreFacts};
use std::collections::BTreeMap;
use std::time::Instant;
use thiserror::Error;
use tokio::sync::RwLock;

/// Longest accepted item key.
pub const MAX_KEY_LENGTH: usize = 128;

/// Largest accepted item value, in bytes.
pub const MAX_VALUE_LENGTH: usize = 64 * 1024;

/// Store failures. Each one is also recorded as a failed query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Value too large: {0} bytes")]
    ValueTooLarge(usize),
}

/// Keyed string storage shared by all requests.
#[derive(Debug, Default)]
pub struct MemStore {
    items: RwLock<BTreeMap<String, String>>,
}

impl MemStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Identity reported in the `db` status entry.
    #[must_use]
    pub fn facts(&self) -> StoreFacts {
        StoreFacts {
            label: "MemStore".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub async fn get(&self, key: &str, log: &EventLog) -> Result<Option<String>, StoreError> {
        let started = Instant::now();
        let statement = format!("GET items/{}", key);
        if let Err(e) = validate_key(key) {
            log.query(
                QueryRecord::new(statement, started.elapsed())
                    .with_caller("get")
                    .with_error(e.to_string()),
            );
            return Err(e);
        }

        let value = self.items.read().await.get(key).cloned();
        log.query(QueryRecord::new(statement, started.elapsed()).with_caller("get"));
        log.cache_lookup("items", value.is_some());
        Ok(value)
    }

    /// Store `value` under `key`, returning the value it replaced.
    pub async fn put(
        &self,
        key: &str,
        value: String,
        log: &EventLog,
    ) -> Result<Option<String>, StoreError> {
        let started = Instant::now();
        let statement = format!("PUT items/{}", key);
        let checked = validate_key(key).and_then(|()| {
            if value.len() > MAX_VALUE_LENGTH {
                Err(StoreError::ValueTooLarge(value.len()))
            } else {
                Ok(())
            }
        });
        if let Err(e) = checked {
            log.query(
                QueryRecord::new(statement, started.elapsed())
                    .with_caller("put")
                    .with_error(e.to_string()),
            );
            return Err(e);
        }

        let previous = self.items.write().await.insert(key.to_string(), value);
        log.query(QueryRecord::new(statement, started.elapsed()).with_caller("put"));
        Ok(previous)
    }

    /// Every key, in order.
    pub async fn keys(&self, log: &EventLog) -> Vec<String> {
        let started = Instant::now();
        let keys: Vec<String> = self.items.read().await.keys().cloned().collect();
        log.query(QueryRecord::new("SCAN items", started.elapsed()).with_caller("keys"));
        keys
    }
}

fn validate_key(key: &str) -> Result<(), StoreError> {
    if key.is_empty() {
        return Err(StoreError::InvalidKey("key must not be empty".to_string()));
    }
    if key.len() > MAX_KEY_LENGTH {
        return Err(StoreError::InvalidKey(format!(
            "key exceeds {} bytes",
            MAX_KEY_LENGTH
        )));
    }
    if key.chars().any(char::is_control) {
        return Err(StoreError::InvalidKey(
            "key contains control characters".to_string(),
        ));
    }
    Ok(())
}
