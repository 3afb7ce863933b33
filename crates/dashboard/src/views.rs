use crate::charts::{self, BoxPlot, LineChart, PieSlice};
use crate::session::Notice;
use askama::Template;
use common::Config;
use ledger::models::{format_cents, Category, ExpenseRecord};
use ledger::Ledger;
use std::collections::HashSet;

pub struct NoticeView {
    pub class: &'static str,
    pub message: String,
}

pub struct ExpenseRowView {
    pub position: usize,
    pub category: String,
    pub amount: String,
    pub date: String,
    pub is_outlier: bool,
}

pub struct BudgetStatusView {
    pub over_budget: bool,
    pub remaining: String,
    pub utilization: String,
    pub progress_percent: String,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub currency: String,
    pub budget: String,
    pub max_budget: u32,
    pub today: String,
    pub categories: Vec<&'static str>,
    pub notice: Option<NoticeView>,
    pub expenses: Vec<ExpenseRowView>,
    pub total_spent: String,
    pub status: BudgetStatusView,
    pub pie: Vec<PieSlice>,
    pub trend: Option<LineChart>,
    pub box_plot: Option<BoxPlot>,
    pub outliers: Vec<ExpenseRowView>,
}

fn row_view(position: usize, r: &ExpenseRecord, is_outlier: bool) -> ExpenseRowView {
    ExpenseRowView {
        position: position + 1,
        category: r.category.to_string(),
        amount: format_cents(r.amount),
        date: r.date.format("%Y-%m-%d").to_string(),
        is_outlier,
    }
}

impl DashboardTemplate {
    pub fn build(ledger: &Ledger, config: &Config, notice: Option<Notice>) -> Self {
        let outliers = ledger.detect_outliers();
        let flagged: HashSet<usize> = outliers.iter().map(|o| o.position).collect();

        let expenses = ledger
            .records()
            .iter()
            .enumerate()
            .map(|(i, r)| row_view(i, r, flagged.contains(&i)))
            .collect();

        let status = BudgetStatusView {
            over_budget: ledger.is_over_budget(),
            remaining: format_cents(ledger.remaining()),
            utilization: format!("{:.2}", ledger.budget_utilization()),
            progress_percent: format!("{:.1}", ledger.budget_progress() * 100.0),
        };

        Self {
            currency: config.currency_symbol.clone(),
            budget: format_cents(ledger.budget()),
            max_budget: config.max_budget,
            today: chrono::Local::now().date_naive().format("%Y-%m-%d").to_string(),
            categories: Category::ALL.iter().map(|c| c.as_str()).collect(),
            notice: notice.map(|n| NoticeView {
                class: n.level.css_class(),
                message: n.message,
            }),
            expenses,
            total_spent: format_cents(ledger.total_spent()),
            status,
            pie: charts::pie_chart(&ledger.spending_by_category()),
            trend: charts::line_chart(&ledger.monthly_trend()),
            box_plot: charts::box_plot(&ledger.amounts(), &outliers),
            outliers: outliers
                .iter()
                .map(|o| row_view(o.position, &o.record, true))
                .collect(),
        }
    }

    pub fn has_expenses(&self) -> bool {
        !self.expenses.is_empty()
    }
}
