//! The normalize → predict → decode path shared by every transport.

use std::sync::Arc;

use serde::Serialize;

use crate::error::{PulseError, Result};
use crate::ml::{LabelEncoder, SignalModel};
use crate::signal;

/// A decoded model verdict.
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub label: String,
    pub confidence: f32,
}

/// Ties the model and the label encoder together behind one call.
///
/// Built once at startup; shared read-only across all connections.
pub struct Classifier {
    model: Arc<dyn SignalModel>,
    encoder: LabelEncoder,
    signal_len: usize,
}

impl Classifier {
    /// Fails fast when the model's output width and the encoder's class
    /// count disagree; that mismatch must never survive to request time.
    pub fn new(
        model: Arc<dyn SignalModel>,
        encoder: LabelEncoder,
        signal_len: usize,
    ) -> Result<Self> {
        if signal_len == 0 {
            return Err(PulseError::Validation(
                "signal_len must be > 0".to_string(),
            ));
        }
        if model.output_dim() != encoder.len() {
            return Err(PulseError::Validation(format!(
                "model outputs {} classes but encoder maps {}",
                model.output_dim(),
                encoder.len()
            )));
        }
        Ok(Self {
            model,
            encoder,
            signal_len,
        })
    }

    pub fn signal_len(&self) -> usize {
        self.signal_len
    }

    /// Classify an arbitrary-length signal.
    pub fn classify(&self, samples: &[f32]) -> Result<Prediction> {
        let fixed = signal::fix_length(samples, self.signal_len);
        let probs = self.model.predict(&fixed)?;
        let (index, confidence) = argmax(&probs).ok_or_else(|| {
            PulseError::Inference("model produced an empty probability vector".to_string())
        })?;
        let label = self.encoder.decode(index)?.to_string();
        Ok(Prediction { label, confidence })
    }
}

/// First (lowest-index) maximum — the standard argmax convention.
fn argmax(values: &[f32]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (index, &value) in values.iter().enumerate() {
        match best {
            Some((_, top)) if value <= top => {}
            _ => best = Some((index, value)),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedModel {
        probs: Vec<f32>,
        expected_len: usize,
    }

    impl SignalModel for FixedModel {
        fn output_dim(&self) -> usize {
            self.probs.len()
        }

        fn predict(&self, signal: &[f32]) -> Result<Vec<f32>> {
            assert_eq!(signal.len(), self.expected_len);
            Ok(self.probs.clone())
        }
    }

    fn classifier(probs: Vec<f32>) -> Classifier {
        let classes = (0..probs.len()).map(|i| format!("CLASS{i}")).collect();
        Classifier::new(
            Arc::new(FixedModel {
                probs,
                expected_len: 16,
            }),
            LabelEncoder::new(classes).unwrap(),
            16,
        )
        .unwrap()
    }

    #[test]
    fn picks_the_maximum_class() {
        let clf = classifier(vec![0.1, 0.7, 0.2]);
        let pred = clf.classify(&[0.5; 16]).unwrap();
        assert_eq!(pred.label, "CLASS1");
        assert!((pred.confidence - 0.7).abs() < 1e-6);
    }

    #[test]
    fn ties_resolve_to_the_lowest_index() {
        let clf = classifier(vec![0.1, 0.4, 0.4, 0.1]);
        let pred = clf.classify(&[0.5; 16]).unwrap();
        assert_eq!(pred.label, "CLASS1");
    }

    #[test]
    fn short_input_is_padded_before_inference() {
        // FixedModel asserts the normalized length inside predict.
        let clf = classifier(vec![0.9, 0.1]);
        let pred = clf.classify(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(pred.label, "CLASS0");
    }

    #[test]
    fn rejects_dimension_mismatch_at_construction() {
        let model = Arc::new(FixedModel {
            probs: vec![0.5, 0.5],
            expected_len: 16,
        });
        let encoder =
            LabelEncoder::new(vec!["A".to_string(), "B".to_string(), "C".to_string()]).unwrap();
        assert!(Classifier::new(model, encoder, 16).is_err());
    }

    #[test]
    fn argmax_is_first_maximum() {
        assert_eq!(argmax(&[1.0, 3.0, 3.0, 2.0]), Some((1, 3.0)));
        assert_eq!(argmax(&[]), None);
    }
}
