//! Entry point for the notes-server binary.

use std::sync::Arc;

use axum::middleware;
use notes_core::SystemClock;
use notes_server::{
    NotesService,
    config::{LogFormat, ServerConfig, StoreBackend},
    identity::build_verifier,
    middleware::request_id::{propagate_request_id, request_id_layer},
    routes,
    state::AppState,
};
use notes_store::{MemoryStore, NotesStore, PgStore, StoreConfig, StoreResult};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env()?;

    init_tracing(&config.log_level, config.log_format);

    tracing::info!("Starting notes-server");
    tracing::info!(
        port = config.port,
        store = ?config.store_backend,
        note_ids = %config.note_id_strategy,
        prefix = %config.api_prefix,
        "Configuration loaded"
    );

    let store = open_store(&config).await?;
    let verifier = build_verifier(&config)?;
    let service = NotesService::new(
        store,
        verifier,
        Arc::new(SystemClock),
        config.note_id_strategy,
    );

    let cors = config.cors_allowed_origins.layer();
    let addr = config.socket_addr();
    let state = AppState::new(service, config);

    let app = routes::build_router(state)
        .layer(middleware::from_fn(propagate_request_id))
        .layer(request_id_layer())
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initialize the tracing subscriber. `RUST_LOG` wins over `LOG_LEVEL`.
fn init_tracing(log_level: &str, format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

/// Open the configured backend and provision `SEED_USERS` into it.
async fn open_store(config: &ServerConfig) -> StoreResult<Arc<dyn NotesStore>> {
    match config.store_backend {
        StoreBackend::Postgres => {
            let store = PgStore::connect(StoreConfig::from_env()?).await?;
            tracing::info!("Connected to database");
            for user in &config.seed_users {
                store.upsert_user(user).await?;
                store.ensure_folder(&user.root).await?;
            }
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store: notes are lost on restart");
            let store = MemoryStore::new();
            for user in &config.seed_users {
                store
                    .insert_user_with_root(&user.uid, user.root.as_str())
                    .await;
            }
            Ok(Arc::new(store))
        }
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
