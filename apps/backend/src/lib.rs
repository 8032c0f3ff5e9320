pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use literacy_core::{ContentRepository, InMemoryContentRepository, RuleRegistry};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::AppConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn ContentRepository>,
    pub rules: &'static RuleRegistry,
    pub search_timeout: Option<Duration>,
}

impl AppState {
    pub fn new(repo: Arc<dyn ContentRepository>) -> Self {
        Self {
            repo,
            rules: RuleRegistry::builtin(),
            search_timeout: None,
        }
    }

    pub fn with_search_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.search_timeout = timeout;
        self
    }
}

/// All API routes, without middleware layers.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // Content routes
        .route("/v1/content", get(routes::content::list).post(routes::content::create))
        .route("/v1/content/search", post(routes::content::search))
        .route("/v1/content/filter", post(routes::content::filter))
        .route("/v1/content/milestone", post(routes::content::milestone))
        .route("/v1/content/random", get(routes::content::random))
        .route("/v1/content/without-tokens", post(routes::content::without_tokens))
        .route("/v1/content/:id", get(routes::content::get))
        // Classification routes
        .route("/v1/classify", post(routes::classify::classify_metrics))
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    let rules = RuleRegistry::builtin();
    tracing::info!(version = rules.version(), "Rule tables loaded");

    let items = match &config.seed_path {
        Some(path) => services::seed::load_seed(path, rules).await?,
        None => {
            tracing::warn!("CONTENT_SEED_PATH not set, starting with an empty repository");
            Vec::new()
        }
    };
    let repo = Arc::new(InMemoryContentRepository::from_items(items));

    let state = AppState::new(repo).with_search_timeout(config.search_timeout);

    let app = build_router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = config.addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
