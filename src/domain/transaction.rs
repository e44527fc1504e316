use std::{fmt, str::FromStr};

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{ExpenseError, Result};

/// Opaque record identifier. Fresh ids are UUID v4 strings; ids produced
/// elsewhere are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for TransactionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TransactionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Income/expense classification; decides the sign in totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    #[default]
    Expense,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }

    pub fn sign(self) -> f64 {
        match self {
            TransactionKind::Income => 1.0,
            TransactionKind::Expense => -1.0,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = ExpenseError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(ExpenseError::InvalidInput(format!(
                "unknown transaction type `{other}` (expected income or expense)"
            ))),
        }
    }
}

/// A single income or expense entry. `amount` is always a non-negative
/// magnitude; the sign comes from `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub amount: f64,
    pub date: NaiveDateTime,
    #[serde(rename = "type", alias = "kind")]
    pub kind: TransactionKind,
}

impl Transaction {
    pub fn new(
        title: impl Into<String>,
        amount: f64,
        date: NaiveDateTime,
        kind: TransactionKind,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            title: title.into(),
            description: String::new(),
            amount,
            date,
            kind,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_id(mut self, id: impl Into<TransactionId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    /// Amount with the sign implied by `kind` applied.
    pub fn signed_amount(&self) -> f64 {
        self.kind.sign() * self.amount
    }

    /// Case-insensitive substring match on title or description. `needle`
    /// must already be lowercased.
    pub fn matches_keyword(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }
}

/// Form-side candidate record. The amount stays text until submission so a
/// bad value blocks the submit instead of being stored.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    pub title: String,
    pub description: String,
    pub amount: String,
    pub date: NaiveDateTime,
    pub kind: TransactionKind,
}

impl TransactionDraft {
    pub fn from_transaction(transaction: &Transaction) -> Self {
        Self {
            title: transaction.title.clone(),
            description: transaction.description.clone(),
            amount: transaction.amount.to_string(),
            date: transaction.date,
            kind: transaction.kind,
        }
    }

    /// Builds a new record with a fresh id.
    pub fn into_transaction(self) -> Result<Transaction> {
        self.build(TransactionId::new())
    }

    /// Builds the edited version of `existing`, keeping its id.
    pub fn apply_to(self, existing: &Transaction) -> Result<Transaction> {
        self.build(existing.id.clone())
    }

    fn build(self, id: TransactionId) -> Result<Transaction> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ExpenseError::InvalidInput("title must not be empty".into()));
        }
        let amount = parse_amount(&self.amount)?;
        Ok(Transaction {
            id,
            title: title.to_string(),
            description: self.description.trim().to_string(),
            amount,
            date: self.date,
            kind: self.kind,
        })
    }
}

/// Parses a form amount. Rejects non-numeric, non-finite and negative input.
pub fn parse_amount(text: &str) -> Result<f64> {
    let trimmed = text.trim();
    let value: f64 = trimmed
        .parse()
        .map_err(|_| ExpenseError::InvalidAmount(format!("`{trimmed}` is not a number")))?;
    validate_amount(value)
}

pub(crate) fn validate_amount(value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(ExpenseError::InvalidAmount(format!("{value} is not finite")));
    }
    if value < 0.0 {
        return Err(ExpenseError::InvalidAmount(format!(
            "{value} is negative; record the magnitude and pick income or expense"
        )));
    }
    Ok(value)
}

/// Accepts RFC 3339 (converted to local wall-clock time), naive date-times
/// and plain `YYYY-MM-DD` dates (midnight).
pub fn parse_date(text: &str) -> Result<NaiveDateTime> {
    let trimmed = text.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(instant.with_timezone(&Local).naive_local());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(naive);
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(|day| day.and_time(NaiveTime::default()))
        .map_err(|_| ExpenseError::InvalidDate(format!("`{trimmed}` is not a recognised date")))
}
