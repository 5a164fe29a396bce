use serde::{Deserialize, Serialize};

use crate::domain::{Cents, YearMonth};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub income: Cents,
    pub expenses: Cents,
    pub balance: Cents,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySummary {
    /// Bucket key, displayed as YYYY-MM
    pub month: YearMonth,
    pub income: Cents,
    pub expenses: Cents,
    pub balance: Cents,
    pub transaction_count: usize,
}

/// A category whose spending in a month went over its limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetOverrun {
    pub category: String,
    pub limit: Cents,
    pub spent: Cents,
    pub exceeded_by: Cents,
}
