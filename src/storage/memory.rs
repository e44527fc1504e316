use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use crate::errors::{ExpenseError, Result};

use super::KeyValueStorage;

/// In-process storage. Clones share the same slots, which lets a test keep a
/// handle while the store owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slot(key: &str, value: impl Into<String>) -> Self {
        let storage = Self::new();
        if let Ok(mut slots) = storage.slots.lock() {
            slots.insert(key.to_string(), value.into());
        }
        storage
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let slots = self
            .slots
            .lock()
            .map_err(|_| ExpenseError::InvalidInput("memory storage poisoned".into()))?;
        Ok(slots.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut slots = self
            .slots
            .lock()
            .map_err(|_| ExpenseError::InvalidInput("memory storage poisoned".into()))?;
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
