use anyhow::Result;
use std::io::{self, BufRead, Write};
use thiserror::Error;

use crate::application::{AppError, BudgetService};
use crate::domain::{format_cents, sum_cents, Cents, TransactionKind};

use super::input::{
    parse_amount, parse_kind_choice, parse_month_number, parse_optional_date, parse_year,
    parse_year_month, InputError,
};

const RULE_WIDTH: usize = 50;

/// Why a menu action stopped early.
#[derive(Error, Debug)]
enum ActionError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    App(#[from] AppError),

    /// Input stream closed mid-prompt
    #[error("input closed")]
    Closed,

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Numbered text menu over the budget service.
///
/// Domain and input errors are reported and the session continues; only the
/// Exit choice (or end of input) ends it.
pub struct Shell<'a, R, W> {
    service: &'a BudgetService,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Shell<'a, R, W> {
    pub fn new(service: &'a BudgetService, input: R, output: W) -> Self {
        Self {
            service,
            input,
            output,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        loop {
            self.print_menu()?;
            let choice = match self.prompt("\nEnter your choice (1-8): ")? {
                Some(choice) => choice,
                None => break,
            };

            let outcome = match choice.as_str() {
                "1" => self.add_transaction(TransactionKind::Income).await,
                "2" => self.add_transaction(TransactionKind::Expense).await,
                "3" => self.view_balance().await,
                "4" => self.view_monthly_summary().await,
                "5" => self.view_category_breakdown().await,
                "6" => self.set_budget_limit().await,
                "7" => self.check_budget_exceeded().await,
                "8" => break,
                _ => {
                    writeln!(self.output, "✗ Invalid choice. Please try again.")?;
                    Ok(())
                }
            };

            match outcome {
                Ok(()) => {}
                Err(ActionError::Closed) => break,
                Err(ActionError::Io(e)) => return Err(e.into()),
                Err(ActionError::Input(e)) => {
                    tracing::warn!("Rejected input: {}", e);
                    writeln!(self.output, "✗ {}", e)?;
                }
                Err(ActionError::App(e)) if e.is_domain_error() => {
                    tracing::warn!("Rejected operation: {}", e);
                    writeln!(self.output, "✗ Error: {}", e)?;
                }
                Err(ActionError::App(e)) => {
                    tracing::error!("Operation failed: {}", e);
                    writeln!(self.output, "✗ An error occurred: {}", e)?;
                }
            }
        }

        writeln!(self.output, "\n✓ Thank you for using Budget Tracker!")?;
        self.output.flush()?;
        Ok(())
    }

    /// Print `label` and read one trimmed line. `None` at end of input.
    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = Vec::new();
        if self.input.read_until(b'\n', &mut line)? == 0 {
            return Ok(None);
        }
        // Undecodable bytes become U+FFFD and fail validation downstream
        Ok(Some(String::from_utf8_lossy(&line).trim().to_string()))
    }

    fn ask(&mut self, label: &str) -> Result<String, ActionError> {
        self.prompt(label)?.ok_or(ActionError::Closed)
    }

    fn print_header(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "\n{}", "=".repeat(RULE_WIDTH))?;
        writeln!(self.output, "  {}", text)?;
        writeln!(self.output, "{}", "=".repeat(RULE_WIDTH))
    }

    fn print_menu(&mut self) -> io::Result<()> {
        self.print_header("PERSONAL BUDGET TRACKER")?;
        writeln!(self.output)?;
        for (number, label) in [
            "Add Income",
            "Add Expense",
            "View Balance",
            "View Monthly Summary",
            "View Category Breakdown",
            "Set Budget Limit",
            "Check Budget Exceeded",
            "Exit",
        ]
        .iter()
        .enumerate()
        {
            writeln!(self.output, "{}. {}", number + 1, label)?;
        }
        Ok(())
    }

    async fn add_transaction(&mut self, kind: TransactionKind) -> Result<(), ActionError> {
        writeln!(self.output, "\n--- Add {} ---", kind.label())?;
        let valid = self.service.categories().for_kind(kind).join(", ");
        writeln!(self.output, "Valid categories: {}", valid)?;

        let category = self.ask("Enter category: ")?;
        let amount = parse_amount(&self.ask("Enter amount: ")?)?;
        let description = self.ask("Enter description: ")?;
        let date = parse_optional_date(
            &self.ask("Enter date (YYYY-MM-DD) or press Enter for today: ")?,
        )?;

        match kind {
            TransactionKind::Income => {
                self.service
                    .add_income(amount, &category, &description, date)
                    .await?
            }
            TransactionKind::Expense => {
                self.service
                    .add_expense(amount, &category, &description, date)
                    .await?
            }
        }

        writeln!(self.output, "✓ {} added successfully!", kind.label())?;
        Ok(())
    }

    async fn view_balance(&mut self) -> Result<(), ActionError> {
        let balance = self.service.balance().await?;

        self.print_header("Current Balance")?;
        writeln!(self.output, "Total Income:     {}", money(balance.income))?;
        writeln!(self.output, "Total Expenses:   {}", money(balance.expenses))?;
        writeln!(self.output, "Balance:          {}", money(balance.balance))?;
        Ok(())
    }

    async fn view_monthly_summary(&mut self) -> Result<(), ActionError> {
        let year = parse_year(&self.ask("Enter year (YYYY): ")?)?;
        let month = parse_month_number(&self.ask("Enter month (MM): ")?)?;

        let summary = self.service.monthly_summary(year, month).await?;

        self.print_header(&format!("Monthly Summary - {}", summary.month))?;
        writeln!(self.output, "Income:           {}", money(summary.income))?;
        writeln!(self.output, "Expenses:         {}", money(summary.expenses))?;
        writeln!(self.output, "Balance:          {}", money(summary.balance))?;
        writeln!(self.output, "Transactions:     {}", summary.transaction_count)?;
        Ok(())
    }

    async fn view_category_breakdown(&mut self) -> Result<(), ActionError> {
        writeln!(self.output, "\n--- Category Breakdown ---")?;
        writeln!(self.output, "1. Income")?;
        writeln!(self.output, "2. Expense")?;
        let kind = parse_kind_choice(&self.ask("Select type: ")?)?;

        let breakdown = self.service.category_breakdown(kind).await?;
        let total = sum_cents(breakdown.values().copied()).ok_or_else(|| {
            AppError::AmountOverflow(format!("{} categories", kind.label().to_lowercase()))
        })?;

        self.print_header(&format!("Category Breakdown - {}", kind.label()))?;
        if breakdown.is_empty() {
            writeln!(self.output, "No transactions found")?;
            return Ok(());
        }

        let mut rows: Vec<(String, Cents)> = breakdown.into_iter().collect();
        // Largest first; ties keep alphabetical order.
        rows.sort_by(|a, b| b.1.cmp(&a.1));

        for (category, amount) in &rows {
            let percentage = if total > 0 {
                *amount as f64 / total as f64 * 100.0
            } else {
                0.0
            };
            writeln!(
                self.output,
                "{:<20} {:>11} ({:>5.1}%)",
                category,
                money(*amount),
                percentage
            )?;
        }
        writeln!(self.output, "\n{:<20} {:>11}", "Total", money(total))?;
        Ok(())
    }

    async fn set_budget_limit(&mut self) -> Result<(), ActionError> {
        writeln!(self.output, "\n--- Set Budget Limit ---")?;
        let category = self.ask("Enter expense category: ")?;
        let limit = parse_amount(&self.ask("Enter budget limit: ")?)?;
        let month = parse_year_month(&self.ask("Enter month (YYYY-MM): ")?)?;

        self.service.set_budget_limit(&category, limit, month).await?;
        writeln!(self.output, "✓ Budget limit set successfully!")?;
        Ok(())
    }

    async fn check_budget_exceeded(&mut self) -> Result<(), ActionError> {
        let month = parse_year_month(&self.ask("Enter month (YYYY-MM): ")?)?;
        let exceeded = self.service.check_budget_exceeded(month).await?;

        self.print_header(&format!("Budget Check - {}", month))?;
        if exceeded.is_empty() {
            writeln!(self.output, "✓ All budgets are within limits!")?;
            return Ok(());
        }

        writeln!(self.output, "⚠ Budget Exceeded:")?;
        for item in &exceeded {
            writeln!(self.output, "\n  Category: {}", item.category)?;
            writeln!(self.output, "  Limit:    {}", money(item.limit))?;
            writeln!(self.output, "  Spent:    {}", money(item.spent))?;
            writeln!(self.output, "  Exceeded: {}", money(item.exceeded_by))?;
        }
        Ok(())
    }
}

fn money(cents: Cents) -> String {
    format!("${}", format_cents(cents))
}
