//! Signal normalization and input parsing.
//!
//! Every signal reaching the model goes through [`fix_length`] first; the
//! two parsers cover the transport formats (comma-separated stream frames,
//! single-column CSV uploads).

use crate::error::{PulseError, Result};

/// Fixed analysis length every signal is padded or truncated to.
pub const SIGNAL_LEN: usize = 5000;

/// Fix a signal to exactly `target_len` samples.
///
/// Longer inputs keep their first `target_len` samples; shorter inputs are
/// zero-padded at the end. Never fails, for any input length including zero.
pub fn fix_length(samples: &[f32], target_len: usize) -> Vec<f32> {
    let mut fixed = Vec::with_capacity(target_len);
    if samples.len() >= target_len {
        fixed.extend_from_slice(&samples[..target_len]);
    } else {
        fixed.extend_from_slice(samples);
        fixed.resize(target_len, 0.0);
    }
    fixed
}

/// Parse a comma-separated text frame into samples.
///
/// Empty tokens are dropped; any remaining token that is not a number fails
/// the whole frame, and a frame with no values at all is its own error.
pub fn parse_stream_frame(text: &str) -> Result<Vec<f32>> {
    let mut values = Vec::new();
    for token in text.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let value: f32 = token.parse().map_err(|_| PulseError::InvalidFormat)?;
        values.push(value);
    }
    if values.is_empty() {
        return Err(PulseError::EmptySignal);
    }
    Ok(values)
}

/// Parse the first column of a header-less CSV body into samples.
pub fn parse_csv_column(text: &str) -> Result<Vec<f32>> {
    let mut values = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let first = line.split(',').next().unwrap_or("").trim();
        let value: f32 = first.parse().map_err(|_| PulseError::InvalidFormat)?;
        values.push(value);
    }
    if values.is_empty() {
        return Err(PulseError::EmptySignal);
    }
    Ok(values)
}
