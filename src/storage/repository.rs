use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;

use crate::domain::{
    BudgetLimit, Cents, NewTransaction, Transaction, TransactionKind, YearMonth,
};

use super::{MIGRATION_001_TRANSACTIONS, MIGRATION_002_BUDGET_LIMITS};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Totals over every transaction ever recorded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BalanceTotals {
    pub income: Cents,
    pub expenses: Cents,
}

impl BalanceTotals {
    pub fn balance(&self) -> Cents {
        self.income - self.expenses
    }
}

/// Durable record of transactions and budget limits, backed by SQLite.
///
/// Every operation is a single statement, so each write is committed before
/// the call returns and a crash never leaves a half-written row.
pub struct LedgerStore {
    pool: SqlitePool,
}

impl LedgerStore {
    /// Create a new store over the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database URL.
    /// The database file is created if it doesn't exist.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("Invalid database URL: {}", database_url))?
            .create_if_missing(true);

        // One user, one writer.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations. Safe to run against an existing database.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_TRANSACTIONS)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;

        sqlx::query(MIGRATION_002_BUDGET_LIMITS)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 002")?;

        Ok(())
    }

    /// Initialize a database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let store = Self::connect(database_url).await?;
        store.migrate().await?;
        tracing::info!(database = database_url, "Ledger store initialized");
        Ok(store)
    }

    // ========================
    // Transaction operations
    // ========================

    /// Append a transaction, assigning its id and `recorded_at`.
    /// Field values are stored as given; validation belongs to the caller.
    pub async fn insert_transaction(&self, new: &NewTransaction) -> Result<Transaction> {
        let recorded_at = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO transactions (date, amount_cents, category, description, kind, recorded_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(new.date.format(DATE_FORMAT).to_string())
        .bind(new.amount_cents)
        .bind(&new.category)
        .bind(&new.description)
        .bind(new.kind.as_str())
        .bind(recorded_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to insert transaction")?;

        Ok(Transaction {
            id: result.last_insert_rowid(),
            date: new.date,
            amount_cents: new.amount_cents,
            category: new.category.clone(),
            description: new.description.clone(),
            kind: new.kind,
            recorded_at,
        })
    }

    /// List transactions, newest date first.
    /// Among equal dates the most recently inserted comes first.
    pub async fn query_transactions(
        &self,
        category: Option<&str>,
        kind: Option<TransactionKind>,
    ) -> Result<Vec<Transaction>> {
        let mut query = String::from(
            "SELECT id, date, amount_cents, category, description, kind, recorded_at FROM transactions WHERE 1=1",
        );

        if category.is_some() {
            query.push_str(" AND category = ?");
        }
        if kind.is_some() {
            query.push_str(" AND kind = ?");
        }

        query.push_str(" ORDER BY date DESC, id DESC");

        let mut sql_query = sqlx::query(&query);

        if let Some(cat) = category {
            sql_query = sql_query.bind(cat);
        }
        if let Some(k) = kind {
            sql_query = sql_query.bind(k.as_str());
        }

        let rows = sql_query
            .fetch_all(&self.pool)
            .await
            .context("Failed to query transactions")?;

        rows.iter().map(Self::row_to_transaction).collect()
    }

    /// Total income and expenses over all transactions, using SQL aggregation.
    pub async fn balance(&self) -> Result<BalanceTotals> {
        let row = sqlx::query(
            r#"
            SELECT
                COALESCE(SUM(CASE WHEN kind = 'income' THEN amount_cents ELSE 0 END), 0) as income,
                COALESCE(SUM(CASE WHEN kind = 'expense' THEN amount_cents ELSE 0 END), 0) as expenses
            FROM transactions
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .context("Failed to compute balance")?;

        Ok(BalanceTotals {
            income: row.get("income"),
            expenses: row.get("expenses"),
        })
    }

    fn row_to_transaction(row: &sqlx::sqlite::SqliteRow) -> Result<Transaction> {
        let date_str: String = row.get("date");
        let kind_str: String = row.get("kind");
        let recorded_at_str: String = row.get("recorded_at");

        Ok(Transaction {
            id: row.get("id"),
            date: NaiveDate::parse_from_str(&date_str, DATE_FORMAT)
                .with_context(|| format!("Invalid transaction date: {}", date_str))?,
            amount_cents: row.get("amount_cents"),
            category: row.get("category"),
            description: row.get("description"),
            kind: TransactionKind::from_str(&kind_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid transaction kind: {}", kind_str))?,
            recorded_at: DateTime::parse_from_rfc3339(&recorded_at_str)
                .context("Invalid recorded_at timestamp")?
                .with_timezone(&Utc),
        })
    }

    // ========================
    // Budget limit operations
    // ========================

    /// Set the limit for a category, replacing any existing one whatever its month.
    /// The replacement is a new row, so it sorts after every older limit.
    pub async fn upsert_budget_limit(
        &self,
        category: &str,
        limit_cents: Cents,
        month: YearMonth,
    ) -> Result<BudgetLimit> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin budget limit transaction")?;

        sqlx::query("DELETE FROM budget_limits WHERE category = ?")
            .bind(category)
            .execute(&mut *tx)
            .await
            .context("Failed to replace budget limit")?;

        let row = sqlx::query(
            r#"
            INSERT INTO budget_limits (category, limit_cents, month)
            VALUES (?, ?, ?)
            RETURNING id, category, limit_cents, month
            "#,
        )
        .bind(category)
        .bind(limit_cents)
        .bind(month.to_string())
        .fetch_one(&mut *tx)
        .await
        .context("Failed to save budget limit")?;

        let limit = Self::row_to_budget_limit(&row)?;
        tx.commit().await.context("Failed to commit budget limit")?;
        Ok(limit)
    }

    /// All limits whose month is exactly `month`, in insertion order.
    pub async fn query_budget_limits(&self, month: YearMonth) -> Result<Vec<BudgetLimit>> {
        let rows = sqlx::query(
            r#"
            SELECT id, category, limit_cents, month
            FROM budget_limits
            WHERE month = ?
            ORDER BY id
            "#,
        )
        .bind(month.to_string())
        .fetch_all(&self.pool)
        .await
        .context("Failed to query budget limits")?;

        rows.iter().map(Self::row_to_budget_limit).collect()
    }

    fn row_to_budget_limit(row: &sqlx::sqlite::SqliteRow) -> Result<BudgetLimit> {
        let month_str: String = row.get("month");

        Ok(BudgetLimit {
            id: row.get("id"),
            category: row.get("category"),
            month: month_str
                .parse()
                .with_context(|| format!("Invalid budget month: {}", month_str))?,
            limit_cents: row.get("limit_cents"),
        })
    }
}
