//! Golf Brain Back binary entrypoint wiring the REST routes to the configured table store.

use std::{env, net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use golf_brain_back::{
    config::AppConfig,
    dao::table_store::memory::MemoryStore,
    routes,
    state::{AppState, SharedState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let backend = env::var("GOLF_BRAIN_STORE").unwrap_or_else(|_| "postgrest".into());

    let app_state = match backend.as_str() {
        "memory" => memory_state(config),
        other => {
            if other != "postgrest" {
                warn!(backend = other, "unknown storage backend; using postgrest");
            }
            remote_state(config)
        }
    };

    let app = build_router(app_state);

    let port = env::var("PORT")
        .or_else(|_| env::var("SERVER_PORT"))
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, backend = %backend, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// In-process store for local runs. A single bearer token may be registered for a fixed user.
fn memory_state(config: AppConfig) -> SharedState {
    let store = MemoryStore::new();
    if let Ok(token) = env::var("GOLF_BRAIN_DEV_TOKEN") {
        let user = env::var("GOLF_BRAIN_DEV_USER")
            .ok()
            .and_then(|raw| Uuid::parse_str(&raw).ok())
            .unwrap_or_else(Uuid::new_v4);
        info!(%user, "registered development session");
        store.register_token(token, user);
    }
    AppState::with_store(config, Arc::new(store))
}

/// Start degraded and let the supervisor install the PostgREST store once it answers.
#[cfg(feature = "postgrest-store")]
fn remote_state(config: AppConfig) -> SharedState {
    use golf_brain_back::{
        dao::{
            storage::StorageError,
            table_store::{
                TableStore,
                postgrest::{PostgrestConfig, PostgrestStore},
            },
        },
        services::storage_supervisor,
    };

    let state = AppState::new(config);
    tokio::spawn(storage_supervisor::run(state.clone(), || async {
        let config = PostgrestConfig::from_env()?;
        let store = PostgrestStore::connect(config).await?;
        Ok::<_, StorageError>(Arc::new(store) as Arc<dyn TableStore>)
    }));
    state
}

#[cfg(not(feature = "postgrest-store"))]
fn remote_state(config: AppConfig) -> SharedState {
    warn!("built without the postgrest-store feature; staying in degraded mode");
    AppState::new(config)
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut term = signal(SignalKind::terminate()).expect("install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
