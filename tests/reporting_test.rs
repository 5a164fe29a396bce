mod common;

use anyhow::Result;
use common::{parse_date, test_service, JanuaryLedger};
use tally::application::AppError;
use tally::domain::{TransactionKind, YearMonth};

fn month(s: &str) -> YearMonth {
    s.parse().unwrap()
}

#[tokio::test]
async fn test_monthly_summary() -> Result<()> {
    let (service, _temp) = test_service().await?;
    JanuaryLedger::record(&service).await?;

    let summary = service.monthly_summary(2024, 1).await?;

    assert_eq!(summary.month.to_string(), "2024-01");
    assert_eq!(summary.income, 100000);
    assert_eq!(summary.expenses, 8000);
    assert_eq!(summary.balance, 92000);
    assert_eq!(summary.transaction_count, 3);

    Ok(())
}

#[tokio::test]
async fn test_monthly_summary_only_counts_that_month() -> Result<()> {
    let (service, _temp) = test_service().await?;
    JanuaryLedger::record(&service).await?;

    service
        .add_expense(9900, "Food", "", Some(parse_date("2024-02-01")))
        .await?;
    service
        .add_expense(4400, "Food", "", Some(parse_date("2023-12-31")))
        .await?;
    service
        .add_income(5000, "Bonus", "", Some(parse_date("2023-01-20")))
        .await?;

    let january = service.monthly_summary(2024, 1).await?;
    assert_eq!(january.expenses, 8000);
    assert_eq!(january.transaction_count, 3);

    let february = service.monthly_summary(2024, 2).await?;
    assert_eq!(february.income, 0);
    assert_eq!(february.expenses, 9900);
    assert_eq!(february.balance, -9900);
    assert_eq!(february.transaction_count, 1);

    Ok(())
}

#[tokio::test]
async fn test_monthly_summary_empty_month() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let summary = service.monthly_summary(2030, 12).await?;
    assert_eq!(summary.month.to_string(), "2030-12");
    assert_eq!(
        (summary.income, summary.expenses, summary.balance),
        (0, 0, 0)
    );
    assert_eq!(summary.transaction_count, 0);

    Ok(())
}

#[tokio::test]
async fn test_monthly_summary_rejects_bad_month() -> Result<()> {
    let (service, _temp) = test_service().await?;

    assert!(matches!(
        service.monthly_summary(2024, 13).await,
        Err(AppError::InvalidMonth(_))
    ));
    assert!(matches!(
        service.monthly_summary(2024, 0).await,
        Err(AppError::InvalidMonth(_))
    ));

    Ok(())
}

#[tokio::test]
async fn test_category_breakdown() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service.add_expense(5000, "Food", "", None).await?;
    service.add_expense(3000, "Food", "", None).await?;
    service.add_expense(2000, "Transport", "", None).await?;
    service.add_income(100000, "Salary", "", None).await?;

    let expenses = service.category_breakdown(TransactionKind::Expense).await?;
    assert_eq!(expenses.len(), 2);
    assert_eq!(expenses.get("Food"), Some(&8000));
    assert_eq!(expenses.get("Transport"), Some(&2000));
    assert!(!expenses.contains_key("Shopping"));

    let income = service.category_breakdown(TransactionKind::Income).await?;
    assert_eq!(income.len(), 1);
    assert_eq!(income.get("Salary"), Some(&100000));

    Ok(())
}

#[tokio::test]
async fn test_category_breakdown_empty() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let breakdown = service.category_breakdown(TransactionKind::Expense).await?;
    assert!(breakdown.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_check_budget_exceeded() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service.set_budget_limit("Food", 10000, month("2024-01")).await?;
    service
        .add_expense(5000, "Food", "", Some(parse_date("2024-01-05")))
        .await?;
    service
        .add_expense(6000, "Food", "", Some(parse_date("2024-01-20")))
        .await?;

    let exceeded = service.check_budget_exceeded(month("2024-01")).await?;
    assert_eq!(exceeded.len(), 1);

    let entry = &exceeded[0];
    assert_eq!(entry.category, "Food");
    assert_eq!(entry.limit, 10000);
    assert_eq!(entry.spent, 11000);
    assert_eq!(entry.exceeded_by, 1000);

    Ok(())
}

#[tokio::test]
async fn test_check_budget_within_limits() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service.set_budget_limit("Food", 10000, month("2024-01")).await?;
    service
        .set_budget_limit("Transport", 3000, month("2024-01"))
        .await?;

    // Exactly at the limit is not over it
    service
        .add_expense(10000, "Food", "", Some(parse_date("2024-01-05")))
        .await?;
    // Spending in other months doesn't count
    service
        .add_expense(9000, "Transport", "", Some(parse_date("2024-02-05")))
        .await?;

    assert!(service.check_budget_exceeded(month("2024-01")).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_check_budget_only_uses_limits_for_that_month() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service.set_budget_limit("Food", 1000, month("2024-02")).await?;
    service
        .add_expense(5000, "Food", "", Some(parse_date("2024-01-05")))
        .await?;

    // No limit is stored for January
    assert!(service.check_budget_exceeded(month("2024-01")).await?.is_empty());
    // The February limit sees no February spending
    assert!(service.check_budget_exceeded(month("2024-02")).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_check_budget_multiple_in_store_order() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service
        .set_budget_limit("Shopping", 2000, month("2024-01"))
        .await?;
    service
        .set_budget_limit("Entertainment", 1000, month("2024-01"))
        .await?;
    service
        .set_budget_limit("Healthcare", 50000, month("2024-01"))
        .await?;

    for (category, amount) in [("Entertainment", 4500), ("Shopping", 2500), ("Healthcare", 100)] {
        service
            .add_expense(amount, category, "", Some(parse_date("2024-01-10")))
            .await?;
    }

    let exceeded = service.check_budget_exceeded(month("2024-01")).await?;
    let categories: Vec<&str> = exceeded.iter().map(|e| e.category.as_str()).collect();
    assert_eq!(categories, vec!["Shopping", "Entertainment"]);
    assert_eq!(exceeded[0].exceeded_by, 500);
    assert_eq!(exceeded[1].exceeded_by, 3500);

    Ok(())
}

#[tokio::test]
async fn test_check_budget_lists_reset_limit_last() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service.set_budget_limit("Food", 1000, month("2024-01")).await?;
    service
        .set_budget_limit("Transport", 1000, month("2024-01"))
        .await?;
    service.set_budget_limit("Food", 2000, month("2024-01")).await?;

    for category in ["Food", "Transport"] {
        service
            .add_expense(2500, category, "", Some(parse_date("2024-01-10")))
            .await?;
    }

    let exceeded = service.check_budget_exceeded(month("2024-01")).await?;
    let categories: Vec<&str> = exceeded.iter().map(|e| e.category.as_str()).collect();
    assert_eq!(categories, vec!["Transport", "Food"]);
    assert_eq!(exceeded[1].exceeded_by, 500);

    Ok(())
}

#[tokio::test]
async fn test_reports_out_of_range_totals_as_errors() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service.set_budget_limit("Food", 10000, month("2024-01")).await?;
    service
        .add_expense(i64::MAX, "Food", "", Some(parse_date("2024-01-05")))
        .await?;
    service
        .add_expense(1, "Food", "", Some(parse_date("2024-01-06")))
        .await?;

    let result = service.monthly_summary(2024, 1).await;
    assert!(matches!(result, Err(AppError::AmountOverflow(_))));

    let result = service.category_breakdown(TransactionKind::Expense).await;
    assert!(matches!(result, Err(AppError::AmountOverflow(_))));

    let err = service
        .check_budget_exceeded(month("2024-01"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AmountOverflow(_)));
    assert!(err.is_domain_error());

    // Other months and kinds are unaffected
    assert_eq!(service.monthly_summary(2024, 2).await?.transaction_count, 0);
    assert!(service
        .category_breakdown(TransactionKind::Income)
        .await?
        .is_empty());

    Ok(())
}

#[tokio::test]
async fn test_set_budget_limit_validation() -> Result<()> {
    let (service, _temp) = test_service().await?;

    assert!(matches!(
        service.set_budget_limit("Salary", 10000, month("2024-01")).await,
        Err(AppError::InvalidCategory { .. })
    ));
    assert!(matches!(
        service.set_budget_limit("Food", 0, month("2024-01")).await,
        Err(AppError::InvalidAmount(_))
    ));

    assert!(service.get_budget_limits(month("2024-01")).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_set_budget_limit_latest_wins() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service.set_budget_limit("Food", 10000, month("2024-01")).await?;
    let latest = service.set_budget_limit("Food", 25000, month("2024-03")).await?;

    assert_eq!(latest.limit_cents, 25000);
    assert!(service.get_budget_limits(month("2024-01")).await?.is_empty());

    let march = service.get_budget_limits(month("2024-03")).await?;
    assert_eq!(march.len(), 1);
    assert_eq!(march[0].limit_cents, 25000);

    Ok(())
}
