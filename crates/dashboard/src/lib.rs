pub mod charts;
pub mod error;
pub mod handler;
pub mod session;
pub mod views;

pub use error::DashboardError;
