use axum::Router;
use axum_embed::ServeEmbed;
use clap::Parser;
use common::{session::session_layer, AppState, Config};
use rust_embed::RustEmbed;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(RustEmbed, Clone)]
#[folder = "public/"]
struct Assets;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Initialize Logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 2. Load Config from .env, environment and CLI args
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env file loaded: {}", e);
    }
    let config = Config::parse();
    tracing::info!(
        "Budget defaults: {}{} (max {})",
        config.currency_symbol,
        config.default_budget,
        config.max_budget
    );

    let state = Arc::new(AppState {
        config: config.clone(),
    });

    // 3. Session Store (one ledger per browser session)
    let session_layer = session_layer(&config);

    // 4. Routing
    let serve_assets = ServeEmbed::<Assets>::new();
    for file in Assets::iter() {
        tracing::debug!("Embedded file: {}", file);
    }

    let app = Router::<Arc<AppState>>::new()
        .nest_service("/public", serve_assets)
        .merge(dashboard::handler::dashboard_router(state.clone()))
        .with_state(state)
        .layer(session_layer)
        .layer(TraceLayer::new_for_http());

    // 5. Start Server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
