//! Cardio Predict Server
//!
//! Single-page form that runs six pre-trained classifiers on three
//! clinical values (age, CK-MB, troponin).
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     CARDIO PREDICT                       │
//! ├──────────────────────────────────────────────────────────┤
//! │  ┌────────────┐   ┌────────────┐   ┌──────────────────┐  │
//! │  │  Form /    │   │  JSON API  │   │  Health /        │  │
//! │  │  Results   │   │  /api/v1   │   │  Background      │  │
//! │  └─────┬──────┘   └─────┬──────┘   └──────────────────┘  │
//! │        └────────┬───────┘                                │
//! │                 ▼                                        │
//! │   ArtifactSet (scaler + 6 classifiers, loaded once)      │
//! └──────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod handlers;
mod views;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cardio_predict_core::ArtifactSet;

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before reading RUST_LOG
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "cardio_predict_server=debug,cardio_predict_core=info,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config::Config::from_env();

    tracing::info!("Cardio Predict Server starting...");
    if !config.is_production() {
        tracing::debug!(?config, "configuration");
    }

    // Artifacts are required: no partial startup
    let state = AppState::load(config.clone())?;

    let app = create_router(state);

    let addr = SocketAddr::new(config.bind_addr, config.port);
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub artifacts: Arc<ArtifactSet>,
    pub config: config::Config,
    /// Background image path, when the file exists
    pub background: Option<PathBuf>,
}

impl AppState {
    /// Load artifacts and resolve the background image
    pub fn load(config: config::Config) -> anyhow::Result<Self> {
        let artifacts = ArtifactSet::load(&config.artifact_dir)
            .with_context(|| format!("failed to load artifacts from {}", config.artifact_dir.display()))?;
        tracing::info!("Loaded {} models", artifacts.len());

        let background = if config.background_image.is_file() {
            Some(config.background_image.clone())
        } else {
            tracing::warn!(
                "Background image {} not found, page will render without it",
                config.background_image.display()
            );
            None
        };

        Ok(Self {
            artifacts: Arc::new(artifacts),
            config,
            background,
        })
    }
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    // Page routes
    let page_routes = Router::new()
        .route("/", get(handlers::form::index))
        .route("/background", get(handlers::background::image))
        .route("/health", get(handlers::health::check));

    // JSON API
    let api_routes = Router::new()
        .route("/api/v1/predict", post(handlers::predict::predict))
        .route("/api/v1/models", get(handlers::models::list));

    Router::new()
        .merge(page_routes)
        .merge(api_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
