use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use readlog_core::{
    create_probe, load_config, validate_config, BookCache, BookSearchService, DailyQuotaTracker,
    DomesticCatalog, GlobalCatalog, GoogleBooksClient, OpenBdClient, SettingsStore,
    SqliteBookCache, SqliteSettingsStore,
};
use readlog_server::{api::create_router, state::AppState};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("readlog v{}", VERSION);

    // Determine config path
    let config_path = std::env::var("READLOG_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Database path: {:?}", config.database.path);
    if config.google_books.api_key.trim().is_empty() {
        warn!("No Google Books API key configured, using keyless requests");
    }

    // Create SQLite stores (one file, separate tables)
    let cache: Arc<dyn BookCache> = Arc::new(
        SqliteBookCache::new(&config.database.path).context("Failed to create book cache")?,
    );
    info!("Book cache initialized");

    let settings: Arc<dyn SettingsStore> = Arc::new(
        SqliteSettingsStore::new(&config.database.path)
            .context("Failed to create settings store")?,
    );
    let quota = Arc::new(DailyQuotaTracker::new(
        settings,
        config.google_books.daily_limit,
    ));
    info!(
        "Quota tracker initialized ({} requests/day)",
        config.google_books.daily_limit
    );

    // Create provider clients
    let domestic: Arc<dyn DomesticCatalog> = Arc::new(
        OpenBdClient::new(&config.openbd).context("Failed to create openBD client")?,
    );
    let global: Arc<dyn GlobalCatalog> = Arc::new(
        GoogleBooksClient::new(&config.google_books)
            .context("Failed to create Google Books client")?,
    );
    if !config.openbd.enabled {
        info!("openBD disabled in config");
    }

    let connectivity = create_probe(&config.connectivity);
    info!("Connectivity probe: {:?}", config.connectivity.probe);

    let search = BookSearchService::standard(
        &config,
        connectivity,
        Arc::clone(&cache),
        Arc::clone(&quota),
        domestic,
        global,
    );

    // Create app state
    let state = Arc::new(AppState::new(config.clone(), search, cache, quota));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
