// src/config/mod.rs
//! Engine configuration: confidence, top-N, bucket weights, partitioning.
//!
//! TOML shape (every key optional):
//! ```toml
//! [scoring]
//! confidence = 0.95
//! top_n = 20
//! compare_by = "total_vote"     # optional side list, display stays Wilson-ranked
//!
//! [aggregate]
//! strategy = "fixed"            # or "quantile"
//! weights = [40, 30, 20, 10]    # defaults to the strategy preset
//! thresholds = [250, 500, 750]
//! empty_bucket = "zero"         # "renormalize" | "error"
//!
//! [reviews]
//! rating_min = 1.0
//! rating_max = 5.0
//! ```

pub mod loader;

use serde::{Deserialize, Serialize};

use crate::analyze::rank::{RankOptions, SortKey, DEFAULT_TOP_N};
use crate::analyze::scoring::DEFAULT_CONFIDENCE;
use crate::analyze::weights::BucketWeights;
use crate::error::ScoringError;
use crate::review::RatingRange;
use crate::time_weighted::{
    EmptyBucketPolicy, PartitionStrategy, TimeWeightOptions, DEFAULT_THRESHOLDS,
};

pub use loader::{
    apply_env_overrides, load_config_default, load_config_from, DEFAULT_CONFIG_JSON,
    DEFAULT_CONFIG_TOML, ENV_CONFIDENCE, ENV_CONFIG_PATH, ENV_TOP_N,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringSection {
    pub confidence: f64,
    pub top_n: usize,
    /// Extra ranking reported next to the Wilson one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compare_by: Option<SortKey>,
}

impl Default for ScoringSection {
    fn default() -> Self {
        Self {
            confidence: DEFAULT_CONFIDENCE,
            top_n: DEFAULT_TOP_N,
            compare_by: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregateSection {
    pub strategy: PartitionStrategy,
    /// `None` picks the preset of `strategy`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weights: Option<BucketWeights>,
    pub thresholds: [f64; 3],
    pub empty_bucket: EmptyBucketPolicy,
}

impl Default for AggregateSection {
    fn default() -> Self {
        Self {
            strategy: PartitionStrategy::Fixed,
            weights: None,
            thresholds: DEFAULT_THRESHOLDS,
            empty_bucket: EmptyBucketPolicy::Zero,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewsSection {
    pub rating_min: f64,
    pub rating_max: f64,
}

impl Default for ReviewsSection {
    fn default() -> Self {
        let r = RatingRange::default();
        Self {
            rating_min: r.min,
            rating_max: r.max,
        }
    }
}

/// Complete configuration for one scoring pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub scoring: ScoringSection,
    pub aggregate: AggregateSection,
    pub reviews: ReviewsSection,
}

impl EngineConfig {
    pub fn rating_range(&self) -> RatingRange {
        RatingRange {
            min: self.reviews.rating_min,
            max: self.reviews.rating_max,
        }
    }

    /// Options for the displayed list. Always keyed on the Wilson bound.
    pub fn rank_options(&self) -> RankOptions {
        RankOptions {
            confidence: self.scoring.confidence,
            top_n: self.scoring.top_n,
            key: SortKey::WilsonLowerBound,
        }
    }

    /// Options for the `compare_by` list, if one is configured.
    pub fn comparison_options(&self) -> Option<RankOptions> {
        self.scoring.compare_by.map(|key| RankOptions {
            key,
            ..self.rank_options()
        })
    }

    pub fn time_weight_options(&self) -> TimeWeightOptions {
        let a = &self.aggregate;
        TimeWeightOptions {
            strategy: a.strategy,
            weights: a.weights.unwrap_or_else(|| a.strategy.default_weights()),
            thresholds: a.thresholds,
            empty_bucket: a.empty_bucket,
            rating_range: self.rating_range(),
        }
    }

    /// Check every section. Called before any review is looked at.
    pub fn validate(&self) -> Result<(), ScoringError> {
        self.rank_options().validate()?;
        self.time_weight_options().validate()
    }
}
