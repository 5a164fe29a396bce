use std::collections::BTreeMap;

use super::{BudgetLimit, Cents, Transaction, TransactionKind, YearMonth};

/// Income and expense totals over some set of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub income: Cents,
    pub expenses: Cents,
    pub count: usize,
}

impl Totals {
    pub fn net(&self) -> Cents {
        self.income - self.expenses
    }
}

/// Add up amounts, or `None` if the total leaves the `Cents` range.
pub fn sum_cents(amounts: impl IntoIterator<Item = Cents>) -> Option<Cents> {
    amounts
        .into_iter()
        .try_fold(0 as Cents, |total, amount| total.checked_add(amount))
}

/// Sum income and expenses for transactions dated inside `month`.
/// `None` if either total overflows.
pub fn totals_for_month(month: YearMonth, transactions: &[Transaction]) -> Option<Totals> {
    transactions
        .iter()
        .filter(|t| month.contains(t.date))
        .try_fold(Totals::default(), |mut totals, t| {
            match t.kind {
                TransactionKind::Income => {
                    totals.income = totals.income.checked_add(t.amount_cents)?
                }
                TransactionKind::Expense => {
                    totals.expenses = totals.expenses.checked_add(t.amount_cents)?
                }
            }
            totals.count += 1;
            Some(totals)
        })
}

/// Sum amounts per category. Categories without transactions are absent.
/// `None` if any category total overflows.
pub fn breakdown_by_category(transactions: &[Transaction]) -> Option<BTreeMap<String, Cents>> {
    let mut breakdown: BTreeMap<String, Cents> = BTreeMap::new();
    for t in transactions {
        let total = breakdown.entry(t.category.clone()).or_insert(0);
        *total = total.checked_add(t.amount_cents)?;
    }
    Some(breakdown)
}

/// Total spent in `limit`'s category during `month`.
/// Only expenses in the limit's category count.
pub fn spent_against_limit(
    limit: &BudgetLimit,
    month: YearMonth,
    transactions: &[Transaction],
) -> Option<Cents> {
    sum_cents(
        transactions
            .iter()
            .filter(|t| t.kind == TransactionKind::Expense)
            .filter(|t| t.category == limit.category)
            .filter(|t| month.contains(t.date))
            .map(|t| t.amount_cents),
    )
}

/// How far `spent` is over the limit, if it is strictly over.
pub fn overrun(limit_cents: Cents, spent: Cents) -> Option<Cents> {
    (spent > limit_cents).then(|| spent - limit_cents)
}
