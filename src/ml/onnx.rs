//! ONNX inference wrapper (pure Rust via `tract-onnx`).
//!
//! Loads the trained network once at startup and specializes it to the
//! single-sample, single-channel input shape `[1, signal_len, 1]`.

use crate::error::{PulseError, Result};
use crate::ml::SignalModel;

use tract_onnx::prelude::*;

pub struct OnnxModel {
    plan: TypedRunnableModel<TypedModel>,
    signal_len: usize,
    output_dim: usize,
}

impl std::fmt::Debug for OnnxModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxModel")
            .field("signal_len", &self.signal_len)
            .field("output_dim", &self.output_dim)
            .finish()
    }
}

impl OnnxModel {
    /// Load an ONNX model and specialize it to a `[1, signal_len, 1]` f32 input.
    pub fn load(path: &str, signal_len: usize) -> Result<Self> {
        if signal_len == 0 {
            return Err(PulseError::Validation(
                "signal_len must be > 0".to_string(),
            ));
        }

        let model = tract_onnx::onnx()
            .model_for_path(path)
            .map_err(|e| PulseError::Internal(format!("onnx load failed: {e}")))?;

        let model = model
            .with_input_fact(
                0,
                InferenceFact::dt_shape(f32::datum_type(), tvec!(1, signal_len, 1)),
            )
            .map_err(|e| PulseError::Internal(format!("onnx input fact failed: {e}")))?;

        let plan = model
            .into_optimized()
            .map_err(|e| PulseError::Internal(format!("onnx optimize failed: {e}")))?
            .into_runnable()
            .map_err(|e| PulseError::Internal(format!("onnx runnable failed: {e}")))?;

        // Infer output_dim by running a dummy forward pass.
        let dummy =
            tract_ndarray::ArrayD::<f32>::zeros(tract_ndarray::IxDyn(&[1, signal_len, 1]))
                .into_tvalue();
        let outputs = plan
            .run(tvec!(dummy))
            .map_err(|e| PulseError::Internal(format!("onnx run failed: {e}")))?;
        if outputs.is_empty() {
            return Err(PulseError::Internal("onnx produced no outputs".to_string()));
        }
        let arr = outputs[0]
            .to_array_view::<f32>()
            .map_err(|e| PulseError::Internal(format!("onnx output decode failed: {e}")))?;
        let output_dim = arr.len();
        if output_dim == 0 {
            return Err(PulseError::Internal(
                "onnx output has zero elements".to_string(),
            ));
        }

        Ok(Self {
            plan,
            signal_len,
            output_dim,
        })
    }
}

impl SignalModel for OnnxModel {
    fn output_dim(&self) -> usize {
        self.output_dim
    }

    fn predict(&self, signal: &[f32]) -> Result<Vec<f32>> {
        if signal.len() != self.signal_len {
            return Err(PulseError::Validation(format!(
                "onnx input length mismatch: got {}, expected {}",
                signal.len(),
                self.signal_len
            )));
        }

        let tensor = tract_ndarray::ArrayD::<f32>::from_shape_vec(
            tract_ndarray::IxDyn(&[1, self.signal_len, 1]),
            signal.to_vec(),
        )
        .map_err(|e| PulseError::Internal(format!("onnx input reshape failed: {e}")))?
        .into_tvalue();

        let outputs = self
            .plan
            .run(tvec!(tensor))
            .map_err(|e| PulseError::Inference(format!("onnx run failed: {e}")))?;
        if outputs.is_empty() {
            return Err(PulseError::Inference(
                "onnx produced no outputs".to_string(),
            ));
        }

        let arr = outputs[0]
            .to_array_view::<f32>()
            .map_err(|e| PulseError::Inference(format!("onnx output decode failed: {e}")))?;

        Ok(arr.iter().copied().collect())
    }
}
