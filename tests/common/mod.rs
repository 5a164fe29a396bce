// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::NaiveDate;
use tally::application::{BudgetService, FixedClock};
use tempfile::TempDir;

/// Processing date seen by services built with `test_service`.
pub const TODAY: &str = "2024-03-10";

/// Helper to create a test service with a temporary database and a fixed clock
pub async fn test_service() -> Result<(BudgetService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("data").join("test.db");
    let service = BudgetService::init(db_path.to_str().unwrap())
        .await?
        .with_clock(FixedClock(parse_date(TODAY)));
    Ok((service, temp_dir))
}

/// Helper to parse a date string into NaiveDate
pub fn parse_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

/// Test fixture: the January 2024 ledger used across reporting tests
pub struct JanuaryLedger;

impl JanuaryLedger {
    /// Salary 1000.00 on the 15th, Food 50.00 and Transport 30.00 on the 16th
    pub async fn record(service: &BudgetService) -> Result<()> {
        service
            .add_income(100000, "Salary", "Monthly salary", Some(parse_date("2024-01-15")))
            .await?;
        service
            .add_expense(5000, "Food", "Groceries", Some(parse_date("2024-01-16")))
            .await?;
        service
            .add_expense(3000, "Transport", "Bus pass", Some(parse_date("2024-01-16")))
            .await?;
        Ok(())
    }
}
