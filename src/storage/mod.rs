pub mod json_backend;
pub mod memory;

use crate::errors::Result;

/// Abstraction over the key-value slot the transaction store persists into.
/// Writes are all-or-nothing at the backend's own guarantee.
pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

pub use json_backend::JsonFileStorage;
pub use memory::MemoryStorage;
