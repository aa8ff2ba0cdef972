use std::sync::Arc;

use log::{error, info};

use crate::artifact::{ArtifactError, ArtifactStore};
use crate::classifier::Predict;

/// Outcome of the one model load attempted at startup. It never changes for
/// the lifetime of the process.
#[derive(Clone)]
pub enum ModelState {
    Loaded(Arc<dyn Predict>),
    Unavailable(String),
}

impl std::fmt::Debug for ModelState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Loaded(_) => f.write_str("Loaded"),
            Self::Unavailable(reason) => f.debug_tuple("Unavailable").field(reason).finish(),
        }
    }
}

impl ModelState {
    /// Attempts to load the artifact, logging the result once.
    pub fn load(store: &ArtifactStore) -> Self {
        match store.load() {
            Ok(pipeline) => {
                info!("Model loaded successfully from {:?}", store.path());
                Self::Loaded(Arc::new(pipeline))
            }
            Err(ArtifactError::NotFound(path)) => {
                error!(
                    "Model file {:?} not found. Please run the training command first.",
                    path
                );
                Self::Unavailable(format!("model file {} not found", path.display()))
            }
            Err(e) => {
                error!("An error occurred while loading the model: {}", e);
                Self::Unavailable(e.to_string())
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }
}

/// Shared application state injected into every handler.
#[derive(Clone, Debug)]
pub struct AppState {
    pub model: ModelState,
}

impl AppState {
    pub fn new(model: ModelState) -> Self {
        Self { model }
    }

    pub fn with_predictor(predictor: Arc<dyn Predict>) -> Self {
        Self::new(ModelState::Loaded(predictor))
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::new(ModelState::Unavailable(reason.into()))
    }
}
