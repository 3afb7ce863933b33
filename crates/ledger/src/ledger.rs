use crate::csv_io::{self, RawExpenseRow};
use crate::error::LedgerError;
use crate::models::{
    AmountError, Category, CategoryTotal, ExpenseRecord, LedgerSummary, MonthlyTotal, Outlier,
    MAX_AMOUNT_CENTS,
};
use crate::stats::{FiveNumberSummary, IqrFence};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const NON_POSITIVE_AMOUNT: &str = "Amount should be greater than zero.";

/// Expense records of one session plus the budget they are measured against.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    records: Vec<ExpenseRecord>,
    budget: i64, // Cents
}

impl Ledger {
    pub fn new(budget: i64) -> Self {
        Self {
            records: Vec::new(),
            budget: budget.max(0),
        }
    }

    pub fn records(&self) -> &[ExpenseRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn budget(&self) -> i64 {
        self.budget
    }

    pub fn set_budget(&mut self, budget: i64) -> Result<(), LedgerError> {
        if budget < 0 {
            return Err(LedgerError::InvalidInput("Budget cannot be negative".into()));
        }
        self.budget = budget;
        Ok(())
    }

    /// Appends a record. Non-positive amounts are rejected and leave the
    /// ledger untouched.
    pub fn add_expense(
        &mut self,
        category: Category,
        amount: i64,
        date: NaiveDate,
    ) -> Result<&ExpenseRecord, LedgerError> {
        if amount <= 0 {
            return Err(LedgerError::InvalidInput(NON_POSITIVE_AMOUNT.into()));
        }
        if amount > MAX_AMOUNT_CENTS {
            return Err(LedgerError::InvalidInput(AmountError::OutOfRange.to_string()));
        }
        self.records.push(ExpenseRecord::new(category, amount, date));
        Ok(&self.records[self.records.len() - 1])
    }

    /// Replaces every record at once. Budget is kept.
    pub fn replace_records(&mut self, records: Vec<ExpenseRecord>) {
        self.records = records;
    }

    /// Replaces the records with the parsed rows, or changes nothing if any
    /// row fails to parse.
    pub fn import_from_csv(&mut self, rows: &[RawExpenseRow]) -> Result<usize, LedgerError> {
        let records = csv_io::parse_rows(rows)?;
        let count = records.len();
        self.replace_records(records);
        Ok(count)
    }

    pub fn export_csv(&self) -> Result<Vec<u8>, LedgerError> {
        Ok(csv_io::export_csv(&self.records)?)
    }

    /// Single amounts are bounded by `MAX_AMOUNT_CENTS`; sums saturate
    /// rather than wrap for ledgers past that headroom.
    pub fn total_spent(&self) -> i64 {
        self.records
            .iter()
            .fold(0i64, |acc, r| acc.saturating_add(r.amount))
    }

    pub fn remaining(&self) -> i64 {
        self.budget.saturating_sub(self.total_spent())
    }

    /// Percentage of the budget spent; 0 when no budget is set.
    pub fn budget_utilization(&self) -> f64 {
        if self.budget > 0 {
            self.total_spent() as f64 / self.budget as f64 * 100.0
        } else {
            0.0
        }
    }

    /// Progress bar fill in `[0, 1]`.
    pub fn budget_progress(&self) -> f64 {
        let total = self.total_spent();
        if self.budget > 0 {
            (total as f64 / self.budget as f64).clamp(0.0, 1.0)
        } else if total > 0 {
            1.0
        } else {
            0.0
        }
    }

    pub fn is_over_budget(&self) -> bool {
        self.total_spent() > self.budget
    }

    pub fn spending_by_category(&self) -> BTreeMap<Category, i64> {
        let mut totals = BTreeMap::new();
        for r in &self.records {
            let total = totals.entry(r.category).or_insert(0i64);
            *total = total.saturating_add(r.amount);
        }
        totals
    }

    pub fn monthly_trend(&self) -> Vec<MonthlyTotal> {
        let mut months: BTreeMap<String, i64> = BTreeMap::new();
        for r in &self.records {
            let total = months.entry(r.month_key()).or_insert(0);
            *total = total.saturating_add(r.amount);
        }
        months
            .into_iter()
            .map(|(month, total)| MonthlyTotal { month, total })
            .collect()
    }

    pub fn amounts(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.amount as f64).collect()
    }

    pub fn outlier_fence(&self) -> Option<IqrFence> {
        IqrFence::from_values(&self.amounts())
    }

    pub fn detect_outliers(&self) -> Vec<Outlier> {
        let Some(fence) = self.outlier_fence() else {
            return Vec::new();
        };
        self.records
            .iter()
            .enumerate()
            .filter(|(_, r)| fence.is_outlier(r.amount as f64))
            .map(|(position, r)| Outlier {
                position,
                record: r.clone(),
            })
            .collect()
    }

    pub fn box_plot(&self) -> Option<FiveNumberSummary> {
        FiveNumberSummary::from_values(&self.amounts())
    }

    pub fn summary(&self) -> LedgerSummary {
        LedgerSummary {
            record_count: self.records.len(),
            budget: self.budget,
            total_spent: self.total_spent(),
            remaining: self.remaining(),
            utilization: self.budget_utilization(),
            over_budget: self.is_over_budget(),
            by_category: self
                .spending_by_category()
                .into_iter()
                .map(|(category, total)| CategoryTotal { category, total })
                .collect(),
            monthly_trend: self.monthly_trend(),
            outliers: self.detect_outliers(),
        }
    }
}
