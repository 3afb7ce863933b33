use crate::error::DashboardError;
use common::Config;
use ledger::Ledger;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

pub const LEDGER_SESSION_KEY: &str = "ledger";
pub const NOTICE_SESSION_KEY: &str = "notice";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

impl NoticeLevel {
    pub fn css_class(&self) -> &'static str {
        match self {
            NoticeLevel::Success => "notice-success",
            NoticeLevel::Warning => "notice-warning",
            NoticeLevel::Error => "notice-error",
        }
    }
}

/// Message shown once on the next dashboard render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Success, message: message.into() }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Warning, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, message: message.into() }
    }
}

/// The session's ledger, or a fresh one at the configured default budget.
pub async fn load_ledger(session: &Session, config: &Config) -> Result<Ledger, DashboardError> {
    let ledger = session.get::<Ledger>(LEDGER_SESSION_KEY).await?;
    Ok(ledger.unwrap_or_else(|| Ledger::new(config.default_budget_cents())))
}

pub async fn save_ledger(session: &Session, ledger: &Ledger) -> Result<(), DashboardError> {
    session.insert(LEDGER_SESSION_KEY, ledger).await?;
    Ok(())
}

pub async fn push_notice(session: &Session, notice: Notice) -> Result<(), DashboardError> {
    session.insert(NOTICE_SESSION_KEY, notice).await?;
    Ok(())
}

pub async fn take_notice(session: &Session) -> Result<Option<Notice>, DashboardError> {
    Ok(session.remove::<Notice>(NOTICE_SESSION_KEY).await?)
}
