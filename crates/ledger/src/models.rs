use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Food,
    Transport,
    Entertainment,
    Books,
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Food,
        Category::Transport,
        Category::Entertainment,
        Category::Books,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Entertainment => "Entertainment",
            Category::Books => "Books",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("Unknown category '{}'", wanted))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub category: Category,
    pub amount: i64, // Cents
    pub date: NaiveDate,
}

impl ExpenseRecord {
    pub fn new(category: Category, amount: i64, date: NaiveDate) -> Self {
        Self { category, amount, date }
    }

    /// Calendar month key, `YYYY-MM`.
    pub fn month_key(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }
}

// ENCAPSULATION: built from raw form input via new(), fields stay private.
#[derive(Debug)]
pub struct CreateExpenseRequest {
    category: Category,
    amount: i64,
    date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct RawCreateExpenseRequest {
    pub category: String,
    pub amount: f64,
    pub date: String,
}

impl CreateExpenseRequest {
    pub fn new(category: &str, amount_dollars: f64, date: &str) -> Result<Self, String> {
        let category = category.parse::<Category>()?;
        let amount = dollars_to_cents(amount_dollars).map_err(|e| e.to_string())?;

        let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
            .map_err(|_| "Invalid date format, expected YYYY-MM-DD".to_string())?;

        Ok(Self {
            category,
            amount,
            date,
        })
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }
}

impl TryFrom<RawCreateExpenseRequest> for CreateExpenseRequest {
    type Error = String;

    fn try_from(raw: RawCreateExpenseRequest) -> Result<Self, Self::Error> {
        CreateExpenseRequest::new(&raw.category, raw.amount, &raw.date)
    }
}

/// Largest amount, in cents, a single value may carry. Leaves 20 bits of
/// headroom so aggregates over a ledger stay inside `i64`.
pub const MAX_AMOUNT_CENTS: i64 = i64::MAX >> 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("Amount must be a number")]
    NotANumber,
    #[error("Amount is too large")]
    OutOfRange,
    #[error("Amount cannot have more than two decimal places")]
    SubCent,
}

/// Converts a decimal amount to cents. Fractions of a cent are an error,
/// not rounded away.
pub fn dollars_to_cents(dollars: f64) -> Result<i64, AmountError> {
    if !dollars.is_finite() {
        return Err(AmountError::NotANumber);
    }
    let scaled = dollars * 100.0;
    let cents = scaled.round();
    if cents.abs() > MAX_AMOUNT_CENTS as f64 {
        return Err(AmountError::OutOfRange);
    }
    // 0.1 * 100.0 is not exactly 10.0
    let tolerance = (cents.abs() * f64::EPSILON * 4.0).max(1e-6);
    if (scaled - cents).abs() > tolerance {
        return Err(AmountError::SubCent);
    }
    Ok(cents as i64)
}

/// Plain decimal with two fractional digits, no grouping.
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub total: i64, // Cents
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTotal {
    pub month: String, // YYYY-MM
    pub total: i64,    // Cents
}

/// A record flagged by the IQR fence, with its position in the ledger.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outlier {
    pub position: usize,
    pub record: ExpenseRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerSummary {
    pub record_count: usize,
    pub budget: i64,
    pub total_spent: i64,
    pub remaining: i64,
    pub utilization: f64,
    pub over_budget: bool,
    pub by_category: Vec<CategoryTotal>,
    pub monthly_trend: Vec<MonthlyTotal>,
    pub outliers: Vec<Outlier>,
}
