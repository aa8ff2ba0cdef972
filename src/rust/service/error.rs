use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

pub const MODEL_UNAVAILABLE: &str = "Model is not loaded or failed to load.";
pub const INVALID_INPUT: &str = "Invalid input. A \"description\" field is required.";
pub const PREDICTION_FAILED: &str = "Failed to make a prediction.";

/// Errors returned to HTTP callers as `{"error": ...}` bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiError {
    ModelUnavailable,
    InvalidInput,
    PredictionFailed,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
}

impl ApiError {
    pub fn status(self) -> StatusCode {
        match self {
            Self::ModelUnavailable | Self::PredictionFailed => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidInput => StatusCode::BAD_REQUEST,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::ModelUnavailable => MODEL_UNAVAILABLE,
            Self::InvalidInput => INVALID_INPUT,
            Self::PredictionFailed => PREDICTION_FAILED,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(ErrorBody { error: self.message() })).into_response()
    }
}

/// Errors that stop the service process.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Failed to bind to address {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),
}
