use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use chrono::NaiveDate;

use crate::domain::{
    breakdown_by_category, format_cents, overrun, spent_against_limit, totals_for_month,
    BudgetLimit, CategorySet, Cents, NewTransaction, Transaction, TransactionKind, YearMonth,
};
use crate::storage::LedgerStore;

use super::{AppError, Balance, BudgetOverrun, Clock, MonthlySummary, SystemClock};

/// Budget operations on top of the ledger store.
/// This is the interface for any client (the interactive shell, tests, ...).
///
/// Nothing is cached: every query reads the store's current state.
pub struct BudgetService {
    store: LedgerStore,
    categories: CategorySet,
    clock: Box<dyn Clock>,
}

impl BudgetService {
    /// Create a service with the default categories and the system clock.
    pub fn new(store: LedgerStore) -> Self {
        Self {
            store,
            categories: CategorySet::default(),
            clock: Box::new(SystemClock),
        }
    }

    pub fn with_categories(mut self, categories: CategorySet) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Open (or create) the database at the given path and apply migrations.
    /// Missing parent directories are created.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        if let Some(parent) = Path::new(database_path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create data directory: {}", parent.display())
                })?;
            }
        }

        let db_url = format!("sqlite:{}", database_path);
        let store = LedgerStore::init(&db_url).await?;
        Ok(Self::new(store))
    }

    pub fn store(&self) -> &LedgerStore {
        &self.store
    }

    /// The processing date, as seen by this service.
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    // ========================
    // Transaction operations
    // ========================

    /// Record an income. `date` defaults to today.
    pub async fn add_income(
        &self,
        amount_cents: Cents,
        category: &str,
        description: &str,
        date: Option<NaiveDate>,
    ) -> Result<(), AppError> {
        self.add_transaction(
            TransactionKind::Income,
            amount_cents,
            category,
            description,
            date,
        )
        .await
    }

    /// Record an expense. `date` defaults to today.
    pub async fn add_expense(
        &self,
        amount_cents: Cents,
        category: &str,
        description: &str,
        date: Option<NaiveDate>,
    ) -> Result<(), AppError> {
        self.add_transaction(
            TransactionKind::Expense,
            amount_cents,
            category,
            description,
            date,
        )
        .await
    }

    async fn add_transaction(
        &self,
        kind: TransactionKind,
        amount_cents: Cents,
        category: &str,
        description: &str,
        date: Option<NaiveDate>,
    ) -> Result<(), AppError> {
        let date = date.unwrap_or_else(|| self.clock.today());

        if !self.categories.contains(kind, category) {
            return Err(AppError::InvalidCategory {
                kind,
                category: category.to_string(),
            });
        }

        if amount_cents <= 0 {
            return Err(AppError::InvalidAmount(format!(
                "{} amount must be positive",
                kind.label()
            )));
        }

        let new = NewTransaction::new(kind, date, amount_cents, category)
            .with_description(description);
        let transaction = self.store.insert_transaction(&new).await?;

        tracing::info!(
            id = transaction.id,
            kind = %kind,
            category,
            amount = %format_cents(amount_cents),
            date = %date,
            "{} added: {} - {}",
            kind.label(),
            category,
            format_cents(amount_cents)
        );
        Ok(())
    }

    /// List transactions, optionally filtered, newest first.
    pub async fn list_transactions(
        &self,
        category: Option<&str>,
        kind: Option<TransactionKind>,
    ) -> Result<Vec<Transaction>, AppError> {
        Ok(self.store.query_transactions(category, kind).await?)
    }

    /// Allowed categories for a kind given by name; empty for an unknown kind.
    pub fn valid_categories(&self, kind: &str) -> &[String] {
        self.categories.for_kind_name(kind)
    }

    pub fn categories(&self) -> &CategorySet {
        &self.categories
    }

    // ========================
    // Reports
    // ========================

    /// Totals over every transaction ever recorded.
    pub async fn balance(&self) -> Result<Balance, AppError> {
        let totals = self.store.balance().await?;
        Ok(Balance {
            income: totals.income,
            expenses: totals.expenses,
            balance: totals.balance(),
        })
    }

    /// Income, expenses and transaction count for one calendar month.
    pub async fn monthly_summary(&self, year: i32, month: u32) -> Result<MonthlySummary, AppError> {
        let month = YearMonth::new(year, month)?;
        let transactions = self.store.query_transactions(None, None).await?;
        let totals = totals_for_month(month, &transactions).ok_or_else(|| {
            AppError::AmountOverflow(format!("transactions for {}", month))
        })?;

        Ok(MonthlySummary {
            month,
            income: totals.income,
            expenses: totals.expenses,
            balance: totals.net(),
            transaction_count: totals.count,
        })
    }

    /// Sum of amounts per category for one kind. Unused categories are absent.
    pub async fn category_breakdown(
        &self,
        kind: TransactionKind,
    ) -> Result<BTreeMap<String, Cents>, AppError> {
        let transactions = self.store.query_transactions(None, Some(kind)).await?;
        breakdown_by_category(&transactions).ok_or_else(|| {
            AppError::AmountOverflow(format!("{} categories", kind.label().to_lowercase()))
        })
    }

    // ========================
    // Budget limits
    // ========================

    /// Set the spending limit for an expense category, replacing any previous one.
    pub async fn set_budget_limit(
        &self,
        category: &str,
        limit_cents: Cents,
        month: YearMonth,
    ) -> Result<BudgetLimit, AppError> {
        if !self.categories.contains(TransactionKind::Expense, category) {
            return Err(AppError::InvalidCategory {
                kind: TransactionKind::Expense,
                category: category.to_string(),
            });
        }

        if limit_cents <= 0 {
            return Err(AppError::InvalidAmount(
                "Budget limit must be positive".to_string(),
            ));
        }

        let limit = self
            .store
            .upsert_budget_limit(category, limit_cents, month)
            .await?;

        tracing::info!(
            category,
            month = %month,
            limit = %format_cents(limit_cents),
            "Budget limit set: {} - {}",
            category,
            format_cents(limit_cents)
        );
        Ok(limit)
    }

    /// Limits set for exactly `month`. Empty when none are set.
    pub async fn get_budget_limits(&self, month: YearMonth) -> Result<Vec<BudgetLimit>, AppError> {
        Ok(self.store.query_budget_limits(month).await?)
    }

    /// Every limit for `month` whose category spending is strictly over it,
    /// in the order the store returns the limits.
    pub async fn check_budget_exceeded(
        &self,
        month: YearMonth,
    ) -> Result<Vec<BudgetOverrun>, AppError> {
        let limits = self.store.query_budget_limits(month).await?;
        let mut exceeded = Vec::new();

        for limit in limits {
            let transactions = self
                .store
                .query_transactions(Some(&limit.category), Some(TransactionKind::Expense))
                .await?;
            let spent = spent_against_limit(&limit, month, &transactions).ok_or_else(|| {
                AppError::AmountOverflow(format!("{} spending in {}", limit.category, month))
            })?;

            if let Some(exceeded_by) = overrun(limit.limit_cents, spent) {
                tracing::warn!(
                    category = %limit.category,
                    month = %month,
                    spent = %format_cents(spent),
                    limit = %format_cents(limit.limit_cents),
                    "Budget exceeded"
                );
                exceeded.push(BudgetOverrun {
                    category: limit.category,
                    limit: limit.limit_cents,
                    spent,
                    exceeded_by,
                });
            }
        }

        Ok(exceeded)
    }
}
