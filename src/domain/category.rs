use serde::{Deserialize, Serialize};

use super::TransactionKind;

/// The allowed categories for each transaction kind.
///
/// This is static configuration, not stored in the database. The default set
/// covers the usual personal budget; a custom one can be loaded from JSON:
///
/// ```json
/// { "income": ["Salary"], "expense": ["Food", "Rent"] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySet {
    income: Vec<String>,
    expense: Vec<String>,
}

impl CategorySet {
    pub fn new(income: Vec<String>, expense: Vec<String>) -> Self {
        Self { income, expense }
    }

    /// Parse a category set from its JSON form.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn for_kind(&self, kind: TransactionKind) -> &[String] {
        match kind {
            TransactionKind::Income => &self.income,
            TransactionKind::Expense => &self.expense,
        }
    }

    /// Categories for a kind given by name. Unknown kinds have no categories.
    pub fn for_kind_name(&self, kind: &str) -> &[String] {
        match TransactionKind::from_str(kind) {
            Some(kind) => self.for_kind(kind),
            None => &[],
        }
    }

    /// Exact, case-sensitive membership check.
    pub fn contains(&self, kind: TransactionKind, category: &str) -> bool {
        self.for_kind(kind).iter().any(|c| c == category)
    }
}

impl Default for CategorySet {
    fn default() -> Self {
        let owned = |names: &[&str]| names.iter().map(|n| n.to_string()).collect();
        Self {
            income: owned(&["Salary", "Bonus", "Investment", "Freelance"]),
            expense: owned(&[
                "Food",
                "Transport",
                "Utilities",
                "Entertainment",
                "Healthcare",
                "Shopping",
                "Other",
            ]),
        }
    }
}
