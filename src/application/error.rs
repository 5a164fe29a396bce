use thiserror::Error;

use crate::domain::{TransactionKind, YearMonthError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid {kind} category: {category}")]
    InvalidCategory {
        kind: TransactionKind,
        category: String,
    },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Total out of range: {0}")]
    AmountOverflow(String),

    #[error("Invalid month: {0}")]
    InvalidMonth(#[from] YearMonthError),

    #[error("Storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl AppError {
    /// True for errors caused by the caller's input rather than the storage layer.
    pub fn is_domain_error(&self) -> bool {
        !matches!(self, AppError::Storage(_))
    }
}
