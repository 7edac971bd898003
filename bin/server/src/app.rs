//! Application state and router.

use crate::rate_limit::rate_limit;
use crate::routes;
use axum::{
    Router, middleware,
    routing::{get, post},
};
use medtrain_ratelimit::RateLimiter;
use medtrain_training::TrainingService;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub training: Arc<TrainingService>,
    pub limiter: RateLimiter,
}

impl AppState {
    pub fn new(training: TrainingService, limiter: RateLimiter) -> Self {
        Self {
            training: Arc::new(training),
            limiter,
        }
    }
}

/// Builds the HTTP router. Everything except `/health` is rate limited.
pub fn router(state: AppState) -> Router {
    let training = Router::new()
        .route("/scenarios", get(routes::list_scenarios))
        .route("/training/start", post(routes::start_training))
        .route("/training/message", post(routes::send_message))
        .route("/training/history", get(routes::dialog_history))
        .route("/training/dialogs", get(routes::list_dialogs))
        .route_layer(middleware::from_fn_with_state(
            state.limiter.clone(),
            rate_limit,
        ));

    Router::new()
        .route("/health", get(routes::health))
        .merge(training)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
