//! Store and the list/chart pipeline that reads from it.

pub mod services;
pub mod transaction_store;
pub mod utils;

pub use transaction_store::{TransactionStore, STORAGE_KEY};
