//! Model loading and label decoding.
//!
//! The inference seam is the [`SignalModel`] trait so transports and tests
//! never depend on the concrete ONNX runtime.

pub mod labels;
pub mod onnx;

use crate::error::Result;

/// A classifier over fixed-length signals.
///
/// `predict` takes exactly one normalized signal and returns one probability
/// per known class. Implementations must be safe to call concurrently.
pub trait SignalModel: Send + Sync {
    /// Number of classes in the output probability vector.
    fn output_dim(&self) -> usize;

    /// Run inference on a single fixed-length signal.
    fn predict(&self, signal: &[f32]) -> Result<Vec<f32>>;
}

pub use labels::LabelEncoder;
pub use onnx::OnnxModel;
