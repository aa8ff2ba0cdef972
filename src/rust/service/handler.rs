use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::{error, info, warn};
use serde::Serialize;
use serde_json::Value;

use super::error::ApiError;
use super::state::{AppState, ModelState};

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub category: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model_loaded: bool,
}

/// Handler for POST /predict
pub async fn predict_handler(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let predictor = match &state.model {
        ModelState::Loaded(predictor) => predictor,
        ModelState::Unavailable(reason) => {
            warn!("Rejecting prediction request, model unavailable: {}", reason);
            return ApiError::ModelUnavailable.into_response();
        }
    };

    // Oversized or unreadable bodies are invalid input, never a bare 413.
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            warn!("Rejecting request with unreadable body: {}", rejection);
            return ApiError::InvalidInput.into_response();
        }
    };

    let Some(description) = extract_description(&body) else {
        warn!("Rejecting request without a description field ({} bytes)", body.len());
        return ApiError::InvalidInput.into_response();
    };

    let text = match description {
        Value::String(text) => text,
        other => {
            error!(
                "An error occurred during prediction: description {} is not text",
                other
            );
            return ApiError::PredictionFailed.into_response();
        }
    };

    match predictor.predict(&text) {
        Ok(category) => {
            info!("Received: '{}' -> Predicted: '{}'", text, category);
            Json(PredictResponse { category }).into_response()
        }
        Err(e) => {
            error!("An error occurred during prediction for '{}': {}", text, e);
            ApiError::PredictionFailed.into_response()
        }
    }
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    info!("Health check requested");
    Json(HealthResponse {
        status: "ok",
        model_loaded: state.model.is_loaded(),
    })
}

/// Pulls the `description` value out of a JSON object body. Anything else,
/// including an empty or unparseable body, yields `None`.
fn extract_description(body: &[u8]) -> Option<Value> {
    if body.is_empty() {
        return None;
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(mut map)) => map.remove("description"),
        Ok(_) => None,
        Err(e) => {
            warn!("Request body is not valid JSON: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_description() {
        assert_eq!(
            extract_description(br#"{"description": "coffee"}"#),
            Some(json!("coffee"))
        );
        assert_eq!(extract_description(br#"{"description": 5}"#), Some(json!(5)));
    }

    #[test]
    fn test_extract_description_rejects_bad_bodies() {
        assert_eq!(extract_description(b""), None);
        assert_eq!(extract_description(b"{}"), None);
        assert_eq!(extract_description(b"not json"), None);
        assert_eq!(extract_description(br#"["description"]"#), None);
        assert_eq!(extract_description(br#"{"note": "coffee"}"#), None);
    }
}
