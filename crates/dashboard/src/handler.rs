use crate::error::DashboardError;
use crate::session::{self, Notice};
use crate::views::DashboardTemplate;
use askama::Template;
use axum::{
    extract::{Multipart, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Json, Router,
};
use common::AppState;
use ledger::models::RawCreateExpenseRequest;
use ledger::service::LedgerService;
use ledger::LedgerError;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_sessions::Session;
use validator::Validate;

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            DashboardError::Ledger(LedgerError::Export(_)) | DashboardError::Infrastructure(_) => {
                tracing::error!("request failed: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            DashboardError::Ledger(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            DashboardError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        (status, Json(json!({ "error": msg }))).into_response()
    }
}

#[derive(Deserialize, Validate)]
pub struct BudgetForm {
    #[validate(range(min = 0.0, message = "Budget cannot be negative"))]
    pub budget: f64,
}

pub fn dashboard_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(get_dashboard))
        .route("/expenses", post(add_expense))
        .route("/budget", post(set_budget))
        .route("/import", post(import_csv))
        .route("/export.csv", get(export_csv))
        .route("/api/summary", get(get_summary))
        .route("/api/expenses", post(add_expense_api))
        .with_state(state)
}

async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<impl IntoResponse, DashboardError> {
    let ledger = session::load_ledger(&session, &state.config).await?;
    let notice = session::take_notice(&session).await?;

    let template = DashboardTemplate::build(&ledger, &state.config, notice);
    Ok(Html(template.render()?))
}

async fn add_expense(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(payload): Form<RawCreateExpenseRequest>,
) -> Result<impl IntoResponse, DashboardError> {
    let mut ledger = session::load_ledger(&session, &state.config).await?;

    let notice = match LedgerService::add_expense(&mut ledger, payload) {
        Ok(record) => {
            tracing::info!("Added {} expense dated {}", record.category, record.date);
            session::save_ledger(&session, &ledger).await?;
            Notice::success("Expense added successfully!")
        }
        Err(LedgerError::InvalidInput(msg)) => {
            tracing::warn!("Rejected expense: {}", msg);
            Notice::warning(msg)
        }
        Err(e) => return Err(e.into()),
    };

    session::push_notice(&session, notice).await?;
    Ok(Redirect::to("/"))
}

async fn set_budget(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(payload): Form<BudgetForm>,
) -> Result<impl IntoResponse, DashboardError> {
    let mut ledger = session::load_ledger(&session, &state.config).await?;

    let result = payload
        .validate()
        .map_err(|e| LedgerError::InvalidInput(e.to_string()))
        .and_then(|_| {
            LedgerService::set_budget(&mut ledger, payload.budget, f64::from(state.config.max_budget))
        });

    match result {
        Ok(()) => session::save_ledger(&session, &ledger).await?,
        Err(e) => {
            tracing::warn!("Rejected budget {}: {}", payload.budget, e);
            session::push_notice(&session, Notice::warning(e.to_string())).await?;
        }
    }

    Ok(Redirect::to("/"))
}

async fn import_csv(
    State(state): State<Arc<AppState>>,
    session: Session,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, DashboardError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| DashboardError::InvalidInput(e.to_string()))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| DashboardError::InvalidInput(e.to_string()))?;
            upload = Some(bytes);
        }
    }

    let Some(bytes) = upload else {
        session::push_notice(&session, Notice::error("No file was uploaded.")).await?;
        return Ok(Redirect::to("/"));
    };

    let mut ledger = session::load_ledger(&session, &state.config).await?;
    let notice = match LedgerService::import_csv(&mut ledger, &bytes[..]) {
        Ok(count) => {
            session::save_ledger(&session, &ledger).await?;
            Notice::success(format!("Expenses loaded successfully! ({} records)", count))
        }
        Err(e @ LedgerError::Import(_)) => Notice::error(e.to_string()),
        Err(e) => return Err(e.into()),
    };

    session::push_notice(&session, notice).await?;
    Ok(Redirect::to("/"))
}

async fn export_csv(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<impl IntoResponse, DashboardError> {
    let ledger = session::load_ledger(&session, &state.config).await?;
    let body = LedgerService::export_csv(&ledger)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"expenses.csv\""),
        ],
        body,
    ))
}

async fn get_summary(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<impl IntoResponse, DashboardError> {
    let ledger = session::load_ledger(&session, &state.config).await?;
    Ok(Json(ledger.summary()))
}

async fn add_expense_api(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<RawCreateExpenseRequest>,
) -> Result<impl IntoResponse, DashboardError> {
    let mut ledger = session::load_ledger(&session, &state.config).await?;
    LedgerService::add_expense(&mut ledger, payload)?;
    session::save_ledger(&session, &ledger).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "records": ledger.records().len() })),
    ))
}
