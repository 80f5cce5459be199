use axum::extract::{Multipart, State};
use axum::Json;
use tracing::{debug, warn};

use crate::api::state::AppState;
use crate::api::types::{ApiError, HealthResponse, PredictionResponse, HEALTH_MESSAGE};
use crate::error::PulseError;
use crate::signal;

/// GET /health -- fixed liveness message, independent of model state.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: HEALTH_MESSAGE.to_string(),
    })
}

/// POST /predict -- multipart CSV upload (field `file`, single column, no
/// header), classified against the shared model.
pub async fn predict_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<PredictionResponse>, ApiError> {
    let mut body: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| PulseError::Validation(format!("invalid multipart upload: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| PulseError::Validation(format!("invalid multipart upload: {e}")))?;
        body = Some(String::from_utf8_lossy(&bytes).into_owned());
        break;
    }

    let body = body.ok_or_else(|| {
        PulseError::Validation("missing multipart field 'file'".to_string())
    })?;

    let samples = signal::parse_csv_column(&body).map_err(|e| {
        warn!("rejected upload: {e}");
        e
    })?;
    debug!("upload parsed: {} samples", samples.len());

    let prediction = state.classifier.classify(&samples)?;
    Ok(Json(PredictionResponse::new(
        prediction,
        state.classifier.signal_len(),
    )))
}
