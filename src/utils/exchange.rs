//! JSON import and export of the whole transaction collection.
//!
//! Import payloads are untrusted: each element is validated field by field
//! into a strict [`Transaction`]. Records that fail are dropped; if none
//! survive, the import is rejected and the store is left untouched.

use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use serde_json::{Map, Value};

use crate::core::TransactionStore;
use crate::domain::{parse_date, Transaction, TransactionId, TransactionKind};
use crate::errors::{ExpenseError, Result};
use crate::storage::json_backend::write_atomic;

const EXPORT_PREFIX: &str = "expenses";

/// Pretty-printed JSON array of every record.
pub fn export_json(transactions: &[Transaction]) -> Result<String> {
    Ok(serde_json::to_string_pretty(transactions)?)
}

/// `expenses-<YYYY-MM-DD>.json`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("{}-{}.json", EXPORT_PREFIX, date.format("%Y-%m-%d"))
}

/// Writes an export file into `dir` and returns its path.
pub fn export_to_dir(transactions: &[Transaction], dir: &Path, today: NaiveDate) -> Result<PathBuf> {
    let path = dir.join(export_file_name(today));
    write_atomic(&path, &export_json(transactions)?)?;
    tracing::info!(path = %path.display(), count = transactions.len(), "transactions exported");
    Ok(path)
}

/// A record dropped during import, with its position in the payload.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRecord {
    pub index: usize,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportReport {
    pub transactions: Vec<Transaction>,
    pub skipped: Vec<SkippedRecord>,
}

/// Validates an import payload without touching any store.
pub fn parse_import(text: &str) -> Result<ImportReport> {
    let payload: Value = serde_json::from_str(text)
        .map_err(|err| ExpenseError::ImportRejected(format!("malformed JSON: {err}")))?;
    let Value::Array(records) = payload else {
        return Err(ExpenseError::ImportRejected(
            "expected a JSON array of transactions".into(),
        ));
    };

    let mut seen = HashSet::new();
    let mut transactions = Vec::with_capacity(records.len());
    let mut skipped = Vec::new();
    for (index, record) in records.iter().enumerate() {
        match validate_record(record, &mut seen) {
            Ok(txn) => transactions.push(txn),
            Err(reason) => {
                tracing::warn!(index, %reason, "import record dropped");
                skipped.push(SkippedRecord { index, reason });
            }
        }
    }

    if transactions.is_empty() {
        return Err(ExpenseError::ImportRejected(format!(
            "none of the {} records passed validation",
            records.len()
        )));
    }
    Ok(ImportReport {
        transactions,
        skipped,
    })
}

/// Reads, validates and swaps the file's records into `store`.
pub fn import_from_path(store: &mut TransactionStore, path: &Path) -> Result<ImportReport> {
    let text = fs::read_to_string(path)?;
    let report = parse_import(&text)?;
    store.replace_all(report.transactions.clone())?;
    tracing::info!(
        path = %path.display(),
        imported = report.transactions.len(),
        skipped = report.skipped.len(),
        "transactions imported"
    );
    Ok(report)
}

fn validate_record(
    record: &Value,
    seen: &mut HashSet<TransactionId>,
) -> std::result::Result<Transaction, String> {
    let Value::Object(fields) = record else {
        return Err("record is not an object".into());
    };

    let title = match fields.get("title") {
        Some(Value::String(title)) if !title.trim().is_empty() => title.clone(),
        _ => return Err("missing or empty title".into()),
    };

    let amount = match fields.get("amount") {
        Some(Value::Number(number)) => number
            .as_f64()
            .ok_or_else(|| "amount out of range".to_string())?,
        _ => return Err("amount is missing or not a number".into()),
    };
    crate::domain::transaction::validate_amount(amount).map_err(|err| err.to_string())?;

    let date = match fields.get("date") {
        Some(Value::String(raw)) => parse_date(raw).map_err(|err| err.to_string())?,
        _ => return Err("date is missing or not a string".into()),
    };

    let kind = read_kind(fields)?;

    let description = match fields.get("description") {
        Some(Value::String(text)) => text.clone(),
        None | Some(Value::Null) => String::new(),
        Some(_) => return Err("description is not a string".into()),
    };

    let id = match fields.get("id") {
        Some(Value::String(raw)) if !raw.trim().is_empty() => {
            let candidate = TransactionId::from(raw.as_str());
            if seen.contains(&candidate) {
                TransactionId::new()
            } else {
                candidate
            }
        }
        _ => TransactionId::new(),
    };
    seen.insert(id.clone());

    Ok(Transaction {
        id,
        title,
        description,
        amount,
        date,
        kind,
    })
}

fn read_kind(fields: &Map<String, Value>) -> std::result::Result<TransactionKind, String> {
    match fields.get("type").or_else(|| fields.get("kind")) {
        None | Some(Value::Null) => Ok(TransactionKind::Expense),
        Some(Value::String(raw)) => raw.parse().map_err(|err: ExpenseError| err.to_string()),
        Some(_) => Err("type is not a string".into()),
    }
}
