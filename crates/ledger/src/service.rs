use crate::csv_io;
use crate::error::LedgerError;
use crate::ledger::Ledger;
use crate::models::{dollars_to_cents, CreateExpenseRequest, ExpenseRecord, RawCreateExpenseRequest};
use std::io::Read;
use tracing::instrument;

pub struct LedgerService;

impl LedgerService {
    #[instrument(skip(ledger))]
    pub fn add_expense(
        ledger: &mut Ledger,
        raw: RawCreateExpenseRequest,
    ) -> Result<ExpenseRecord, LedgerError> {
        let req = CreateExpenseRequest::try_from(raw).map_err(LedgerError::InvalidInput)?;
        let record = ledger
            .add_expense(req.category(), req.amount(), req.date())?
            .clone();
        tracing::debug!(records = ledger.records().len(), "expense added");
        Ok(record)
    }

    #[instrument(skip(ledger))]
    pub fn set_budget(
        ledger: &mut Ledger,
        budget_dollars: f64,
        max_budget_dollars: f64,
    ) -> Result<(), LedgerError> {
        if !budget_dollars.is_finite() || budget_dollars > max_budget_dollars {
            return Err(LedgerError::InvalidInput(format!(
                "Budget must be between 0 and {}",
                max_budget_dollars
            )));
        }
        let cents = dollars_to_cents(budget_dollars)
            .map_err(|e| LedgerError::InvalidInput(e.to_string()))?;
        ledger.set_budget(cents)
    }

    /// Reads a whole CSV file and swaps it into the ledger. On any error the
    /// ledger keeps its previous records.
    #[instrument(skip(ledger, reader))]
    pub fn import_csv<R: Read>(ledger: &mut Ledger, reader: R) -> Result<usize, LedgerError> {
        let rows = csv_io::read_rows(reader)?;
        let count = ledger.import_from_csv(&rows).map_err(|e| {
            tracing::warn!("import rejected: {}", e);
            e
        })?;
        tracing::info!(count, "expenses imported");
        Ok(count)
    }

    #[instrument(skip(ledger))]
    pub fn export_csv(ledger: &Ledger) -> Result<Vec<u8>, LedgerError> {
        ledger.export_csv()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    fn raw(category: &str, amount: f64, date: &str) -> RawCreateExpenseRequest {
        RawCreateExpenseRequest {
            category: category.into(),
            amount,
            date: date.into(),
        }
    }

    #[test]
    fn test_add_expense_from_form_values() {
        let mut ledger = Ledger::new(500000);
        let record = LedgerService::add_expense(&mut ledger, raw("Books", 19.99, "2024-06-01")).unwrap();
        assert_eq!(record.category, Category::Books);
        assert_eq!(record.amount, 1999);
        assert_eq!(ledger.records().len(), 1);
    }

    #[test]
    fn test_add_expense_rejects_zero_and_bad_input() {
        let mut ledger = Ledger::new(500000);
        assert!(LedgerService::add_expense(&mut ledger, raw("Food", 0.0, "2024-06-01")).is_err());
        let err = LedgerService::add_expense(&mut ledger, raw("Food", 0.001, "2024-06-01")).unwrap_err();
        assert_eq!(err.to_string(), "Amount cannot have more than two decimal places");
        assert!(LedgerService::add_expense(&mut ledger, raw("Food", 1e17, "2024-06-01")).is_err());
        assert!(LedgerService::add_expense(&mut ledger, raw("Rent", 5.0, "2024-06-01")).is_err());
        assert!(LedgerService::add_expense(&mut ledger, raw("Food", 5.0, "June 1")).is_err());
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_set_budget_bounds() {
        let mut ledger = Ledger::new(500000);
        LedgerService::set_budget(&mut ledger, 2500.0, 100000.0).unwrap();
        assert_eq!(ledger.budget(), 250000);

        assert!(LedgerService::set_budget(&mut ledger, -1.0, 100000.0).is_err());
        assert!(LedgerService::set_budget(&mut ledger, 100000.5, 100000.0).is_err());
        assert!(LedgerService::set_budget(&mut ledger, f64::INFINITY, 100000.0).is_err());
        assert!(LedgerService::set_budget(&mut ledger, 10.005, 100000.0).is_err());
        assert_eq!(ledger.budget(), 250000);
    }

    #[test]
    fn test_import_csv_all_or_nothing() {
        let mut ledger = Ledger::new(0);
        LedgerService::add_expense(&mut ledger, raw("Food", 10.0, "2024-01-01")).unwrap();

        let bad = "Category,Amount,Date\nFood,1,2024-01-01\nFood,2,not-a-date\n";
        let err = LedgerService::import_csv(&mut ledger, bad.as_bytes()).unwrap_err();
        assert!(err.to_string().starts_with("Error loading file: "));
        assert_eq!(ledger.records().len(), 1);
        assert_eq!(ledger.records()[0].amount, 1000);

        let good = "Category,Amount,Date\nFood,1,2024-01-01\nOther,2,2024-01-02\n";
        assert_eq!(LedgerService::import_csv(&mut ledger, good.as_bytes()).unwrap(), 2);
        assert_eq!(ledger.total_spent(), 300);
    }
}
