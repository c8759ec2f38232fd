//! In-process store for local development and tests

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use super::{Result, SignupStore, StoreError};

#[derive(Default)]
struct Inner {
    lists: HashMap<String, Vec<String>>,
    counters: HashMap<String, i64>,
}

/// Lists and counters kept in a mutex-guarded map
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl SignupStore for MemoryStore {
    async fn list_all(&self, key: &str) -> Result<Vec<String>> {
        Ok(self.lock()?.lists.get(key).cloned().unwrap_or_default())
    }

    async fn append(&self, key: &str, value: &str) -> Result<u64> {
        let mut inner = self.lock()?;
        let list = inner.lists.entry(key.to_string()).or_default();
        list.push(value.to_string());
        Ok(list.len() as u64)
    }

    async fn increment(&self, key: &str) -> Result<i64> {
        let mut inner = self.lock()?;
        let counter = inner.counters.entry(key.to_string()).or_insert(0);
        *counter += 1;
        Ok(*counter)
    }

    async fn counter(&self, key: &str) -> Result<Option<i64>> {
        Ok(self.lock()?.counters.get(key).copied())
    }
}
