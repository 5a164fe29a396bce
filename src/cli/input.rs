use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{parse_cents, Cents, ParseAmountError, TransactionKind, YearMonth, YearMonthError};

/// Malformed text typed at the shell. Never reaches the budget service.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("Invalid amount: {0}")]
    Amount(#[from] ParseAmountError),

    #[error("Invalid date '{0}', use YYYY-MM-DD")]
    Date(String),

    #[error("Invalid year '{0}'")]
    Year(String),

    #[error("Invalid month '{0}'")]
    Month(String),

    #[error("Invalid month: {0}")]
    YearMonth(#[from] YearMonthError),

    #[error("Invalid choice '{0}'")]
    Choice(String),
}

pub fn parse_amount(input: &str) -> Result<Cents, InputError> {
    Ok(parse_cents(input)?)
}

/// Parse an optional `YYYY-MM-DD` date. Blank input means "use today".
pub fn parse_optional_date(input: &str) -> Result<Option<NaiveDate>, InputError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| InputError::Date(input.to_string()))
}

pub fn parse_year(input: &str) -> Result<i32, InputError> {
    let input = input.trim();
    input
        .parse()
        .map_err(|_| InputError::Year(input.to_string()))
}

pub fn parse_month_number(input: &str) -> Result<u32, InputError> {
    let input = input.trim();
    input
        .parse()
        .map_err(|_| InputError::Month(input.to_string()))
}

pub fn parse_year_month(input: &str) -> Result<YearMonth, InputError> {
    Ok(input.trim().parse()?)
}

/// "1" selects income, "2" selects expense.
pub fn parse_kind_choice(input: &str) -> Result<TransactionKind, InputError> {
    match input.trim() {
        "1" => Ok(TransactionKind::Income),
        "2" => Ok(TransactionKind::Expense),
        other => Err(InputError::Choice(other.to_string())),
    }
}
