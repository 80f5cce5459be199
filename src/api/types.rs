use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::PulseError;
use crate::inference::Prediction;

/// Fixed health probe message, returned independent of model state.
pub const HEALTH_MESSAGE: &str = "Backend running successfully";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Classification payload shared by the upload and streaming paths.
///
/// `samples` is always the fixed analysis length, not the input length.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub prediction: String,
    pub confidence: f32,
    pub samples: usize,
}

impl PredictionResponse {
    pub fn new(prediction: Prediction, samples: usize) -> Self {
        Self {
            prediction: prediction.label,
            confidence: prediction.confidence,
            samples,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Client-facing rendering of an error.
///
/// Input-format problems surface verbatim; anything else is reported as a
/// generic server error, identically on both transports.
pub fn client_error_message(err: &PulseError) -> String {
    match err {
        PulseError::InvalidFormat | PulseError::EmptySignal | PulseError::Validation(_) => {
            err.to_string()
        }
        other => format!("Server error: {other}"),
    }
}

/// Error wrapper for HTTP handlers; serializes to the same `{"error": ...}`
/// body the streaming endpoint sends in-band.
#[derive(Debug)]
pub struct ApiError(pub PulseError);

impl From<PulseError> for ApiError {
    fn from(err: PulseError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            PulseError::InvalidFormat | PulseError::EmptySignal | PulseError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorBody {
            error: client_error_message(&self.0),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_errors_render_their_own_message() {
        assert_eq!(
            client_error_message(&PulseError::InvalidFormat),
            "Invalid ECG data format. Send comma-separated numbers."
        );
        assert_eq!(
            client_error_message(&PulseError::EmptySignal),
            "No ECG values received"
        );
    }

    #[test]
    fn other_errors_render_as_server_error() {
        let message = client_error_message(&PulseError::Inference("boom".to_string()));
        assert!(message.starts_with("Server error: "));
        assert!(message.contains("boom"));
    }
}
