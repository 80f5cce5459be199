//! In-process tests for the HTTP endpoints, driven through the router with
//! `tower::util::ServiceExt::oneshot` and a stub model.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use pulse::api::{create_router, AppState};
use pulse::error::Result;
use pulse::inference::Classifier;
use pulse::ml::{LabelEncoder, SignalModel};
use pulse::signal::SIGNAL_LEN;
use serde_json::Value;
use tower::util::ServiceExt;

/// Deterministic stand-in for the ONNX plan.
struct StubModel {
    probs: Vec<f32>,
}

impl SignalModel for StubModel {
    fn output_dim(&self) -> usize {
        self.probs.len()
    }

    fn predict(&self, signal: &[f32]) -> Result<Vec<f32>> {
        assert_eq!(signal.len(), SIGNAL_LEN, "transport must normalize first");
        Ok(self.probs.clone())
    }
}

fn test_state() -> AppState {
    let model = Arc::new(StubModel {
        probs: vec![0.05, 0.85, 0.10],
    });
    let encoder = LabelEncoder::new(vec![
        "ASMI".to_string(),
        "NORM".to_string(),
        "IMI".to_string(),
    ])
    .unwrap();
    let classifier = Classifier::new(model, encoder, SIGNAL_LEN).unwrap();
    AppState::new(Arc::new(classifier))
}

const BOUNDARY: &str = "pulse-test-boundary";

fn multipart_request(field_name: &str, csv: &str) -> Request<Body> {
    let body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"{field_name}\"; filename=\"ecg.csv\"\r\n\
         Content-Type: text/csv\r\n\r\n\
         {csv}\r\n\
         --{BOUNDARY}--\r\n"
    );
    Request::builder()
        .method("POST")
        .uri("/predict")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn response_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn csv_of(rows: usize) -> String {
    (0..rows)
        .map(|i| format!("{:.3}", (i as f32 * 0.01).sin()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[tokio::test]
async fn health_returns_fixed_message() {
    let app = create_router(test_state());

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["status"], "Backend running successfully");
}

#[tokio::test]
async fn upload_with_exact_length_round_trips() {
    let app = create_router(test_state());

    let response = app
        .oneshot(multipart_request("file", &csv_of(SIGNAL_LEN)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["prediction"], "NORM");
    let confidence = json["confidence"].as_f64().unwrap();
    assert!((0.0..=1.0).contains(&confidence));
    assert_eq!(json["samples"], SIGNAL_LEN as u64);
}

#[tokio::test]
async fn upload_longer_than_target_is_truncated() {
    let app = create_router(test_state());

    let response = app
        .oneshot(multipart_request("file", &csv_of(6000)))
        .await
        .unwrap();

    // The stub asserts the normalized length; samples reports the fixed
    // analysis length, not the 6000 input rows.
    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["samples"], SIGNAL_LEN as u64);
}

#[tokio::test]
async fn upload_takes_first_csv_column() {
    let app = create_router(test_state());
    let csv = "0.1,9.0\n0.2,8.0\n0.3,7.0";

    let response = app.oneshot(multipart_request("file", csv)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn malformed_upload_reports_format_error() {
    let app = create_router(test_state());

    let response = app
        .oneshot(multipart_request("file", "abc\ndef"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = response_json(response).await;
    assert_eq!(
        json["error"],
        "Invalid ECG data format. Send comma-separated numbers."
    );
}

#[tokio::test]
async fn empty_upload_reports_no_values() {
    let app = create_router(test_state());

    let response = app.oneshot(multipart_request("file", "")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = response_json(response).await;
    assert_eq!(json["error"], "No ECG values received");
}

#[tokio::test]
async fn missing_file_field_is_rejected() {
    let app = create_router(test_state());

    let response = app
        .oneshot(multipart_request("attachment", "0.1\n0.2"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = response_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("file"));
}
