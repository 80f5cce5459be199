//! Label decoding for the fitted class set.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{PulseError, Result};

/// Fixed index-to-class-name mapping fitted during training.
///
/// Stored as a JSON artifact (`{"classes": ["ASMI", "IMI", ...]}`) exported
/// from the training pipeline; loaded once at startup and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn new(classes: Vec<String>) -> Result<Self> {
        let encoder = Self { classes };
        encoder.validate().map_err(PulseError::Validation)?;
        Ok(encoder)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        let encoder: Self = serde_json::from_str(&content)?;
        encoder.validate().map_err(PulseError::Validation)?;
        Ok(encoder)
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.classes.is_empty() {
            return Err("label encoder has no classes".to_string());
        }
        if self.classes.iter().any(|c| c.trim().is_empty()) {
            return Err("label encoder contains an empty class name".to_string());
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Map a class index back to its name.
    pub fn decode(&self, index: usize) -> Result<&str> {
        self.classes
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| {
                PulseError::Inference(format!(
                    "class index {index} out of range ({} classes)",
                    self.classes.len()
                ))
            })
    }
}
