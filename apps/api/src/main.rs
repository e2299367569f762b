mod config;
mod db;
mod errors;
mod generation;
mod llm_client;
mod models;
mod persistence;
mod render;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::persistence::PgSubmissionStore;
use crate::render::pdf::BrowserRenderer;
use crate::render::template::ResumeTemplate;
use crate::routes::build_router;
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

    info!("Starting Resumer v{}", env!("CARGO_PKG_VERSION"));

    // A panic anywhere requests the same orderly shutdown as a signal.
    let shutdown = CancellationToken::new();
    install_panic_hook(shutdown.clone());

    // Initialize PostgreSQL (fatal on failure)
    let db = create_pool(&config.database_url).await?;

    // Launch the headless browser (fatal on failure)
    let browser = Arc::new(
        BrowserRenderer::launch(config.chrome_executable.as_deref(), config.render_idle_timeout)
            .await
            .context("Failed to launch headless browser")?,
    );

    // Initialize LLM client
    let llm = LlmClient::new(
        config.google_api_key.clone(),
        &config.gemini_api_base,
        &config.gemini_model,
    )?;
    if config.google_api_key.is_none() {
        warn!("GOOGLE_API_KEY is not set; every generation request will fail");
    }
    info!("LLM client initialized (model: {})", llm.model());

    let template = ResumeTemplate::new().context("Failed to load resume template")?;

    // Build app state
    let state = AppState {
        generator: Arc::new(llm),
        renderer: browser.clone(),
        store: Some(Arc::new(PgSubmissionStore::new(db.clone()))),
        template: Arc::new(template),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await;
    if let Err(e) = &served {
        error!("Server error: {e}");
    }

    // Router clones of the browser handle are gone once `serve` returns.
    match Arc::try_unwrap(browser) {
        Ok(browser) => browser.shutdown().await,
        Err(_) => warn!("Browser still referenced at shutdown; leaving it to process exit"),
    }

    info!("Closing database pool...");
    db.close().await;

    info!("Resumer stopped");
    served.map_err(Into::into)
}

/// Any panic stops the server, including one `CatchPanicLayer` answers with a 500.
fn install_panic_hook(shutdown: CancellationToken) {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        error!("Uncaught panic: {panic_info}");
        default_hook(panic_info);
        shutdown.cancel();
    }));
}

/// Resolves on SIGINT, SIGTERM, or cancellation of `shutdown`.
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Shutdown signal received"),
        _ = terminate => info!("SIGTERM received"),
        _ = shutdown.cancelled() => warn!("Shutting down after panic"),
    }
}
