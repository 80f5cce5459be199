use thiserror::Error;

/// Main error type for the inference service
#[derive(Error, Debug)]
pub enum PulseError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    // Network errors
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    // Serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // Client-reportable input errors. The Display strings below are the
    // exact messages sent back over both transports.
    #[error("Invalid ECG data format. Send comma-separated numbers.")]
    InvalidFormat,

    #[error("No ECG values received")]
    EmptySignal,

    // Inference errors
    #[error("Inference failed: {0}")]
    Inference(String),

    // Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Generic errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias for PulseError
pub type Result<T> = std::result::Result<T, PulseError>;
