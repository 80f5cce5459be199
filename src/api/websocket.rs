//! Streaming classification over `WS /ws/ecg`.
//!
//! Text-frame protocol: empty/"ping" frames get a pong, anything else is
//! parsed as comma-separated samples and classified. Each message is handled
//! to completion before the next is read; input errors are reported in-band
//! and keep the connection open.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use serde_json::json;
use tracing::{error, info, warn};

use crate::api::state::AppState;
use crate::api::types::{client_error_message, PredictionResponse};
use crate::error::Result;
use crate::inference::Prediction;
use crate::signal;

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: AppState) {
    info!("ECG stream connected");

    while let Some(Ok(msg)) = socket.recv().await {
        match msg {
            Message::Text(text) => {
                let reply = process_frame(&state, &text);
                // A failed send means the peer is gone; stop quietly.
                if socket.send(Message::Text(reply)).await.is_err() {
                    break;
                }
            }
            Message::Close(_) => break,
            // Binary frames are not part of the protocol; protocol-level
            // pings are answered by axum itself.
            _ => {}
        }
    }

    info!("ECG stream disconnected");
}

/// Produce the reply for one text frame.
fn process_frame(state: &AppState, text: &str) -> String {
    let control = text.trim().to_lowercase();
    if control.is_empty() || control == "ping" {
        return json!({"type": "pong"}).to_string();
    }

    match classify_frame(state, text) {
        Ok(prediction) => {
            let payload =
                PredictionResponse::new(prediction, state.classifier.signal_len());
            match serde_json::to_string(&payload) {
                Ok(reply) => reply,
                Err(e) => {
                    error!("failed to serialize prediction reply: {e}");
                    json!({"error": format!("Server error: {e}")}).to_string()
                }
            }
        }
        Err(e) => {
            warn!("stream frame rejected: {e}");
            json!({"error": client_error_message(&e)}).to_string()
        }
    }
}

fn classify_frame(state: &AppState, text: &str) -> Result<Prediction> {
    let samples = signal::parse_stream_frame(text)?;
    state.classifier.classify(&samples)
}
