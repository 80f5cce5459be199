pub mod api;
pub mod config;
pub mod error;
pub mod inference;
pub mod ml;
pub mod services;
pub mod signal;

pub use config::AppConfig;
pub use error::{PulseError, Result};
pub use inference::{Classifier, Prediction};
pub use ml::{LabelEncoder, OnnxModel, SignalModel};
pub use signal::SIGNAL_LEN;
