//! Shared numeric helpers: mean, linear-interpolated percentile, normal quantile.

use once_cell::sync::Lazy;
use statrs::distribution::{ContinuousCDF, Normal};

use crate::error::ScoringError;

static STANDARD_NORMAL: Lazy<Normal> =
    Lazy::new(|| Normal::new(0.0, 1.0).expect("standard normal parameters are valid"));

/// Arithmetic mean; `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Percentile `p` (0..=100) of an ascending-sorted slice, linear
/// interpolation between closest ranks. Returns 0.0 for an empty slice.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    if sorted.len() == 1 {
        return sorted[0];
    }

    let rank = (p / 100.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let frac = rank - lower as f64;

    if upper >= sorted.len() {
        sorted[sorted.len() - 1]
    } else {
        sorted[lower] * (1.0 - frac) + sorted[upper] * frac
    }
}

/// Reject confidence levels outside the open interval (0, 1).
pub fn validate_confidence(confidence: f64) -> Result<(), ScoringError> {
    if !(confidence.is_finite() && confidence > 0.0 && confidence < 1.0) {
        return Err(ScoringError::invalid_config(
            "scoring.confidence",
            confidence,
            "must lie strictly between 0 and 1",
        ));
    }
    Ok(())
}

/// Two-sided critical value: `z` with `Φ(z) = 1 - (1 - c) / 2`.
///
/// For `c = 0.95` this is ≈ 1.959963985.
pub fn two_sided_z(confidence: f64) -> Result<f64, ScoringError> {
    validate_confidence(confidence)?;
    Ok(STANDARD_NORMAL.inverse_cdf(1.0 - (1.0 - confidence) / 2.0))
}
