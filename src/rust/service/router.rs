use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use super::handler::{health_handler, predict_handler};
use super::state::AppState;

/// Cross-origin requests are accepted from anywhere.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Build the HTTP router (predict + health).
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/predict", post(predict_handler))
        .route("/health", get(health_handler))
        .layer(cors_layer())
        .with_state(state)
}
