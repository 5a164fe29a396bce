use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, BufRead, Write};

use crate::application::BudgetService;
use crate::domain::CategorySet;

mod input;
mod logging;
mod shell;

pub use input::*;
pub use logging::init_tracing;
pub use shell::Shell;

/// Tally - Personal Budget Tracker
#[derive(Parser, Debug)]
#[command(name = "tally")]
#[command(about = "A local personal budget ledger with monthly summaries and spending limits")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "data/budget.db")]
    pub database: String,

    /// Log file path
    #[arg(long, default_value = "budget_app.log")]
    pub log_file: String,

    /// JSON file with custom income/expense categories
    #[arg(long)]
    pub categories: Option<String>,

    /// Also print log lines to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Load the category set: from `--categories` when given, the defaults otherwise.
    pub fn load_categories(&self) -> Result<CategorySet> {
        match &self.categories {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read categories file: {}", path))?;
                CategorySet::from_json(&json)
                    .with_context(|| format!("Invalid categories file: {}", path))
            }
            None => Ok(CategorySet::default()),
        }
    }

    pub async fn run(self) -> Result<()> {
        init_tracing(&self.log_file, self.verbose)?;

        let categories = self.load_categories()?;
        let service = BudgetService::init(&self.database)
            .await
            .with_context(|| format!("Failed to open database: {}", self.database))?
            .with_categories(categories);

        tracing::info!("Budget Tracker application started");

        let stdin = io::stdin();
        let stdout = io::stdout();
        run_shell(&service, stdin.lock(), stdout.lock()).await?;

        tracing::info!("Budget Tracker application closed");
        Ok(())
    }
}

/// Drive the interactive menu over any input/output pair until the user exits.
pub async fn run_shell<R: BufRead, W: Write>(
    service: &BudgetService,
    input: R,
    output: W,
) -> Result<()> {
    let mut shell = Shell::new(service, input, output);
    shell.run().await
}
