use crate::csv_io::ImportError;

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("Error loading file: {0}")]
    Import(#[from] ImportError),
    #[error("Error writing file: {0}")]
    Export(#[from] csv::Error),
}
