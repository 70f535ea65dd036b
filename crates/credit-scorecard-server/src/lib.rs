//! Credit scorecard HTTP API.
//!
//! ```text
//! GET  /                                  service banner
//! GET  /info                              endpoint listing
//! GET  /api/v1/health                     liveness + loaded model version
//! POST /api/v1/predict                    score one application
//! POST /api/v1/predict/batch              score {applications: [...]}
//! GET  /api/v1/model/info                 model description
//! GET  /api/v1/model/feature-importance   ranked features (?method=woe_range)
//! ```

pub mod config;
pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use credit_scorecard_core::Scorecard;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use config::Config;
pub use error::{AppError, AppResult};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub scorecard: Arc<Scorecard>,
    pub config: Config,
}

impl AppState {
    pub fn new(scorecard: Scorecard, config: Config) -> Self {
        Self {
            scorecard: Arc::new(scorecard),
            config,
        }
    }
}

/// Create the router with all routes
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(handlers::health::check))
        .route("/predict", post(handlers::predict::predict))
        .route("/predict/batch", post(handlers::predict::predict_batch))
        .route("/model/info", get(handlers::model::info))
        .route(
            "/model/feature-importance",
            get(handlers::model::feature_importance),
        );

    Router::new()
        .route("/", get(handlers::meta::root))
        .route("/info", get(handlers::meta::info))
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
