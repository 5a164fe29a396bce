use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::Cents;

pub type TransactionId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money coming in (salary, bonus, ...)
    Income,
    /// Money going out (food, transport, ...)
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "income" => Some(TransactionKind::Income),
            "expense" => Some(TransactionKind::Expense),
            _ => None,
        }
    }

    /// Capitalized label for display ("Income", "Expense").
    pub fn label(&self) -> &'static str {
        match self {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Expense",
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A recorded income or expense. Never updated or deleted once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Assigned by the store, monotonically increasing
    pub id: TransactionId,
    /// Calendar date the money moved
    pub date: NaiveDate,
    /// Always positive
    pub amount_cents: Cents,
    pub category: String,
    /// Free text, may be empty
    pub description: String,
    pub kind: TransactionKind,
    /// When the store inserted the row
    pub recorded_at: DateTime<Utc>,
}

/// Field values for a transaction that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub amount_cents: Cents,
    pub category: String,
    pub description: String,
    pub kind: TransactionKind,
}

impl NewTransaction {
    pub fn new(
        kind: TransactionKind,
        date: NaiveDate,
        amount_cents: Cents,
        category: impl Into<String>,
    ) -> Self {
        Self {
            date,
            amount_cents,
            category: category.into(),
            description: String::new(),
            kind,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}
