mod repository;

pub use repository::*;

/// SQL migration for the transactions table
pub const MIGRATION_001_TRANSACTIONS: &str = include_str!("migrations/001_transactions.sql");

/// SQL migration for the budget limits table
pub const MIGRATION_002_BUDGET_LIMITS: &str = include_str!("migrations/002_budget_limits.sql");
