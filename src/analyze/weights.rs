//! Recency bucket weights, in percent.
//!
//! TOML/JSON shape is a plain 4-element array, most recent bucket first:
//!
//! ```toml
//! weights = [40.0, 30.0, 20.0, 10.0]
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ScoringError;

/// Allowed drift of the weight sum away from 100.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Four bucket weights that must sum to 100.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BucketWeights(pub [f64; 4]);

impl BucketWeights {
    /// Preset for fixed day thresholds.
    pub const FIXED_DEFAULT: Self = Self([40.0, 30.0, 20.0, 10.0]);
    /// Preset for age quartiles.
    pub const QUANTILE_DEFAULT: Self = Self([50.0, 25.0, 15.0, 10.0]);

    pub fn new(w1: f64, w2: f64, w3: f64, w4: f64) -> Self {
        Self([w1, w2, w3, w4])
    }

    #[inline]
    pub fn as_array(&self) -> [f64; 4] {
        self.0
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    pub fn validate(&self) -> Result<(), ScoringError> {
        for (i, w) in self.0.iter().enumerate() {
            if !w.is_finite() || *w < 0.0 {
                return Err(ScoringError::invalid_config(
                    format!("aggregate.weights[{i}]"),
                    w,
                    "weight must be a finite, non-negative percentage",
                ));
            }
        }
        let sum = self.sum();
        if (sum - 100.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ScoringError::invalid_config(
                "aggregate.weights",
                format!("{:?} (sum {sum})", self.0),
                "weights must sum to 100",
            ));
        }
        Ok(())
    }

    /// Drop the weights of `empty` buckets and rescale the rest back to 100.
    /// Returns `None` when nothing with positive weight is left.
    pub fn renormalized(&self, empty: &[bool; 4]) -> Option<Self> {
        let mut out = self.0;
        for (w, &is_empty) in out.iter_mut().zip(empty) {
            if is_empty {
                *w = 0.0;
            }
        }
        let kept: f64 = out.iter().sum();
        if kept <= 0.0 {
            return None;
        }
        for w in out.iter_mut() {
            *w *= 100.0 / kept;
        }
        Some(Self(out))
    }
}
