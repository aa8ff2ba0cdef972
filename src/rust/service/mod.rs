//! HTTP prediction service.

pub mod config;
pub mod error;
pub mod handler;
mod router;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ApiError, ServerError};
pub use router::router;
pub use state::{AppState, ModelState};

use crate::artifact::ArtifactStore;

/// Loads the model once and serves until shutdown. A failed load does not stop
/// the service; `/predict` then answers with the model-unavailable error.
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    let store = ArtifactStore::new(&config.model_path);
    let state = AppState::new(ModelState::load(&store));
    server::serve(router(state), &config.bind_address()).await
}
