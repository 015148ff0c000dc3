mod config;
mod delivery;
mod errors;
mod layout;
mod llm_client;
mod routes;
mod scrape;
mod settings;
mod state;
mod tailoring;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::delivery::DownloadDir;
use crate::layout::PageMetrics;
use crate::llm_client::{BackendClient, GeminiClient, TextCompletion};
use crate::routes::build_router;
use crate::settings::JsonFileStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume tailor v{}", env!("CARGO_PKG_VERSION"));

    // Initialize AI provider client
    let llm: Arc<dyn TextCompletion> = Arc::new(GeminiClient::new(config.gemini_api_key.clone())?);
    info!("Gemini client initialized (model: {})", llm_client::MODEL);

    // PDF pipeline text source: remote backend if configured, else the provider
    let resume_source: Arc<dyn TextCompletion> = match &config.backend_url {
        Some(url) => {
            info!("PDF pipeline using remote backend at {url}");
            Arc::new(BackendClient::new(url.clone())?)
        }
        None => llm.clone(),
    };

    let settings = Arc::new(JsonFileStore::new(&config.settings_path));
    info!("Settings store: {}", config.settings_path.display());

    let save_target = Arc::new(DownloadDir::new(&config.download_dir));
    info!("Downloads directory: {}", config.download_dir.display());

    let page_metrics = PageMetrics::a4();
    info!(
        "Page metrics: {}x{}pt, margin {}pt",
        page_metrics.width, page_metrics.height, page_metrics.margin
    );

    // Build app state
    let state = AppState {
        llm,
        resume_source,
        settings,
        save_target,
        page_metrics,
    };

    // Build router; CORS stays permissive because the extension calls from its own origin
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");
    info!("API endpoint available at: POST http://localhost:{}/generate-resume", config.port);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
