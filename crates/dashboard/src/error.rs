use ledger::LedgerError;

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Infrastructure error: {0}")]
    Infrastructure(String),
}

impl From<tower_sessions::session::Error> for DashboardError {
    fn from(err: tower_sessions::session::Error) -> Self {
        DashboardError::Infrastructure(err.to_string())
    }
}

impl From<askama::Error> for DashboardError {
    fn from(err: askama::Error) -> Self {
        DashboardError::Infrastructure(err.to_string())
    }
}
