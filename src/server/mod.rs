mod cookie;
mod handlers;

pub use cookie::{current_session, ensure_session, signing_key, SESSION_COOKIE};

use crate::api::{GeminiClient, Generator};
use crate::config::Config;
use crate::session::{MemorySessionStore, SessionStore};
use anyhow::Context;
use axum::extract::FromRef;
use axum::routing::{get, post};
use axum::Router;
use axum_extra::extract::cookie::Key;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Shared handler state. Everything in here is immutable except the
/// session store, which synchronizes itself.
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<dyn Generator>,
    pub store: Arc<dyn SessionStore>,
    pub key: Key,
    pub max_history_pairs: Option<usize>,
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn new(generator: Arc<dyn Generator>, store: Arc<dyn SessionStore>, key: Key) -> Self {
        Self {
            generator,
            store,
            key,
            max_history_pairs: None,
            static_dir: PathBuf::from(crate::config::DEFAULT_STATIC_DIR),
        }
    }

    pub fn with_max_history_pairs(mut self, max_pairs: Option<usize>) -> Self {
        self.max_history_pairs = max_pairs;
        self
    }

    pub fn with_static_dir(mut self, static_dir: PathBuf) -> Self {
        self.static_dir = static_dir;
        self
    }

    pub fn from_config(config: &Config) -> crate::error::Result<Self> {
        let generator = GeminiClient::from_config(config)?;
        let store = MemorySessionStore::new(config.session_expiry_minutes);

        if config.session_secret.is_none() {
            tracing::warn!(
                "KAUTALIYA_SESSION_SECRET not set, sessions will not survive a restart"
            );
        }
        let key = signing_key(config.session_secret.as_deref());

        Ok(Self::new(Arc::new(generator), Arc::new(store), key)
            .with_max_history_pairs(config.max_history_pairs)
            .with_static_dir(config.static_dir.clone()))
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.key.clone()
    }
}

pub fn build_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.static_dir);

    Router::new()
        .route("/", get(handlers::index))
        .route("/chat", post(handlers::chat))
        .route("/history", get(handlers::history))
        .route("/clear", post(handlers::clear))
        .nest_service("/static", static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(config: Config) -> anyhow::Result<()> {
    let state = AppState::from_config(&config).context("Failed to initialize server state")?;
    let app = build_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind to {address}"))?;

    tracing::info!(
        address = %address,
        model = %config.model,
        endpoint = %config.api_endpoint,
        "chat server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("chat server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Received SIGINT"),
        Err(e) => tracing::error!("Failed to listen for shutdown signal: {e}"),
    }
}
