pub mod csv_io;
pub mod error;
pub mod ledger;
pub mod models;
pub mod service;
pub mod stats;

pub use error::LedgerError;
pub use ledger::Ledger;
