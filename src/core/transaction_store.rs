use std::collections::HashSet;

use crate::domain::{transaction::validate_amount, Transaction, TransactionId};
use crate::errors::{ExpenseError, Result};
use crate::storage::KeyValueStorage;

/// Storage key holding the serialized transaction list.
pub const STORAGE_KEY: &str = "expenses";

/// Sole owner and writer of the transaction collection. Keeps an in-memory
/// mirror in insertion order and writes the full list to storage on every
/// mutation; a failed write leaves the mirror unchanged.
pub struct TransactionStore {
    transactions: Vec<Transaction>,
    storage: Box<dyn KeyValueStorage>,
    key: String,
}

impl TransactionStore {
    pub fn open(storage: Box<dyn KeyValueStorage>) -> Result<Self> {
        Self::open_with_key(storage, STORAGE_KEY)
    }

    pub fn open_with_key(storage: Box<dyn KeyValueStorage>, key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        let transactions: Vec<Transaction> = match storage.get(&key)? {
            Some(raw) if !raw.trim().is_empty() => serde_json::from_str(&raw)?,
            _ => Vec::new(),
        };
        ensure_valid(&transactions)?;
        tracing::info!(key = %key, count = transactions.len(), "transaction store opened");
        Ok(Self {
            transactions,
            storage,
            key,
        })
    }

    /// All records in insertion order.
    pub fn list(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn get(&self, id: &TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| &txn.id == id)
    }

    pub fn add(&mut self, transaction: Transaction) -> Result<()> {
        validate_amount(transaction.amount)?;
        if self.get(&transaction.id).is_some() {
            return Err(ExpenseError::DuplicateId(transaction.id));
        }
        let id = transaction.id.clone();
        let mut next = self.transactions.clone();
        next.push(transaction);
        self.commit(next)?;
        tracing::info!(id = %id, "transaction added");
        Ok(())
    }

    /// Replaces the record sharing `transaction.id`. An unknown id is reported
    /// as [`ExpenseError::TransactionNotFound`] and nothing changes.
    pub fn update(&mut self, transaction: Transaction) -> Result<()> {
        let Some(index) = self.position(&transaction.id) else {
            tracing::debug!(id = %transaction.id, "update skipped: no matching transaction");
            return Err(ExpenseError::TransactionNotFound(transaction.id));
        };
        validate_amount(transaction.amount)?;
        let id = transaction.id.clone();
        let mut next = self.transactions.clone();
        next[index] = transaction;
        self.commit(next)?;
        tracing::info!(id = %id, "transaction updated");
        Ok(())
    }

    pub fn remove(&mut self, id: &TransactionId) -> Result<Transaction> {
        let Some(index) = self.position(id) else {
            return Err(ExpenseError::TransactionNotFound(id.clone()));
        };
        let mut next = self.transactions.clone();
        let removed = next.remove(index);
        self.commit(next)?;
        tracing::info!(id = %id, "transaction removed");
        Ok(removed)
    }

    /// Bulk replacement used by import. The previous contents are discarded,
    /// not merged.
    pub fn replace_all(&mut self, transactions: Vec<Transaction>) -> Result<()> {
        ensure_valid(&transactions)?;
        let count = transactions.len();
        self.commit(transactions)?;
        tracing::info!(count, "transaction store replaced");
        Ok(())
    }

    fn position(&self, id: &TransactionId) -> Option<usize> {
        self.transactions.iter().position(|txn| &txn.id == id)
    }

    fn commit(&mut self, next: Vec<Transaction>) -> Result<()> {
        let json = serde_json::to_string(&next)?;
        self.storage.set(&self.key, &json)?;
        self.transactions = next;
        Ok(())
    }
}

/// Unique ids and finite, non-negative amounts across the whole collection.
fn ensure_valid(transactions: &[Transaction]) -> Result<()> {
    let mut seen = HashSet::with_capacity(transactions.len());
    for txn in transactions {
        validate_amount(txn.amount)?;
        if !seen.insert(&txn.id) {
            return Err(ExpenseError::DuplicateId(txn.id.clone()));
        }
    }
    Ok(())
}
