//! # Time-Weighted Rating
//! Recency-bucketed weighted mean of star ratings.
//!
//! Reviews are split into four disjoint age buckets, most recent first. Each
//! bucket contributes its mean rating times its weight (in percent):
//!
//! ```text
//! rating = Σ mean(bucket_i) · w_i / 100
//! ```
//!
//! Bucket boundaries come either from fixed day thresholds (default 250/500/750)
//! or from the 25th/50th/75th percentiles of the observed ages. The last
//! bucket is open-ended up to the oldest review.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::analyze::weights::BucketWeights;
use crate::error::ScoringError;
use crate::review::{RatingRange, Review};
use crate::stats::{mean, percentile};

/// Default fixed bucket edges, in days (inclusive upper bounds).
pub const DEFAULT_THRESHOLDS: [f64; 3] = [250.0, 500.0, 750.0];

/// How age buckets are delimited.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartitionStrategy {
    /// Configured day thresholds.
    #[default]
    Fixed,
    /// Age quartiles of the input.
    Quantile,
}

impl PartitionStrategy {
    /// Recommended weights for this strategy.
    pub fn default_weights(self) -> BucketWeights {
        match self {
            PartitionStrategy::Fixed => BucketWeights::FIXED_DEFAULT,
            PartitionStrategy::Quantile => BucketWeights::QUANTILE_DEFAULT,
        }
    }
}

/// What an empty bucket does to the aggregate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyBucketPolicy {
    /// Contributes 0 (understates the aggregate).
    #[default]
    Zero,
    /// Excluded; remaining weights are rescaled to 100.
    Renormalize,
    /// Aborts with `ScoringError::EmptyBucket`.
    Error,
}

/// Aggregator configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeWeightOptions {
    pub strategy: PartitionStrategy,
    pub weights: BucketWeights,
    /// Only used by `PartitionStrategy::Fixed`.
    pub thresholds: [f64; 3],
    pub empty_bucket: EmptyBucketPolicy,
    pub rating_range: RatingRange,
}

impl Default for TimeWeightOptions {
    fn default() -> Self {
        Self::for_strategy(PartitionStrategy::Fixed)
    }
}

impl TimeWeightOptions {
    /// Strategy with its recommended weights and default thresholds.
    pub fn for_strategy(strategy: PartitionStrategy) -> Self {
        Self {
            strategy,
            weights: strategy.default_weights(),
            thresholds: DEFAULT_THRESHOLDS,
            empty_bucket: EmptyBucketPolicy::Zero,
            rating_range: RatingRange::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ScoringError> {
        self.weights.validate()?;
        self.rating_range.validate()?;
        if self.strategy == PartitionStrategy::Fixed {
            let t = self.thresholds;
            let finite = t.iter().all(|x| x.is_finite() && *x >= 0.0);
            if !finite || !(t[0] < t[1] && t[1] < t[2]) {
                return Err(ScoringError::invalid_config(
                    "aggregate.thresholds",
                    format!("{t:?}"),
                    "thresholds must be finite, non-negative and strictly increasing",
                ));
            }
        }
        Ok(())
    }
}

/// One age bucket of the breakdown.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AgeBucket {
    pub index: usize,
    /// Exclusive lower edge; `None` for the most recent bucket.
    pub lower: Option<f64>,
    /// Inclusive upper edge; `None` for the oldest (open-ended) bucket.
    pub upper: Option<f64>,
    pub count: usize,
    pub mean_rating: Option<f64>,
    /// Configured weight, percent.
    pub weight: f64,
    /// Weight actually applied after the empty-bucket policy.
    pub effective_weight: f64,
}

impl AgeBucket {
    pub fn range_label(&self) -> String {
        match (self.lower, self.upper) {
            (None, Some(hi)) => format!("<= {hi}"),
            (Some(lo), Some(hi)) => format!("({lo}, {hi}]"),
            (Some(lo), None) => format!("> {lo}"),
            (None, None) => "all".to_string(),
        }
    }
}

/// Non-fatal findings surfaced next to the result.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    EmptyBucket {
        bucket: usize,
        range: String,
        policy: EmptyBucketPolicy,
    },
}

/// Aggregate plus its breakdown.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TimeWeightedRating {
    pub value: f64,
    pub strategy: PartitionStrategy,
    pub buckets: Vec<AgeBucket>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

/// Unweighted mean rating over all reviews.
pub fn average_rating(reviews: &[Review], range: &RatingRange) -> Result<f64, ScoringError> {
    let ratings = checked_ratings(reviews, range)?;
    mean(&ratings).ok_or_else(empty_collection)
}

/// Inclusive upper edges of the first three buckets.
///
/// `sorted_ages` must be ascending; it is only read by the quantile strategy.
pub fn bucket_edges(
    strategy: PartitionStrategy,
    thresholds: [f64; 3],
    sorted_ages: &[f64],
) -> [f64; 3] {
    match strategy {
        PartitionStrategy::Fixed => thresholds,
        PartitionStrategy::Quantile => [
            percentile(sorted_ages, 25.0),
            percentile(sorted_ages, 50.0),
            percentile(sorted_ages, 75.0),
        ],
    }
}

#[inline]
fn bucket_of(age: f64, edges: &[f64; 3]) -> usize {
    edges.iter().position(|&e| age <= e).unwrap_or(3)
}

/// Time-weighted mean rating.
///
/// Configuration is validated first, then every review's rating and age.
/// An empty collection is `InvalidInput`.
pub fn time_weighted_average(
    reviews: &[Review],
    opts: &TimeWeightOptions,
) -> Result<TimeWeightedRating, ScoringError> {
    opts.validate()?;
    let ratings = checked_ratings(reviews, &opts.rating_range)?;
    if ratings.is_empty() {
        return Err(empty_collection());
    }

    let mut sorted_ages: Vec<f64> = reviews.iter().map(|r| r.age_days).collect();
    sorted_ages.sort_by(f64::total_cmp);
    let edges = bucket_edges(opts.strategy, opts.thresholds, &sorted_ages);

    let mut members: [Vec<f64>; 4] = Default::default();
    for (r, &rating) in reviews.iter().zip(&ratings) {
        members[bucket_of(r.age_days, &edges)].push(rating);
    }
    let means: [Option<f64>; 4] = std::array::from_fn(|i| mean(&members[i]));
    let empty: [bool; 4] = means.map(|m| m.is_none());

    let configured = opts.weights.as_array();
    let mut buckets: Vec<AgeBucket> = (0..4)
        .map(|i| AgeBucket {
            index: i,
            lower: if i == 0 { None } else { Some(edges[i - 1]) },
            upper: if i == 3 { None } else { Some(edges[i]) },
            count: members[i].len(),
            mean_rating: means[i],
            weight: configured[i],
            effective_weight: configured[i],
        })
        .collect();

    let mut diagnostics = Vec::new();
    for b in buckets.iter().filter(|b| b.count == 0) {
        let range = b.range_label();
        if opts.empty_bucket == EmptyBucketPolicy::Error {
            return Err(ScoringError::EmptyBucket {
                bucket: b.index,
                range,
            });
        }
        warn!(bucket = b.index, %range, policy = ?opts.empty_bucket, "empty time bucket");
        diagnostics.push(Diagnostic::EmptyBucket {
            bucket: b.index,
            range,
            policy: opts.empty_bucket,
        });
    }

    let effective = match opts.empty_bucket {
        EmptyBucketPolicy::Renormalize => opts.weights.renormalized(&empty).ok_or_else(|| {
            ScoringError::invalid_config(
                "aggregate.weights",
                format!("{configured:?}"),
                "no bucket with a non-zero weight holds any review",
            )
        })?,
        _ => opts.weights,
    };
    for (b, w) in buckets.iter_mut().zip(effective.as_array()) {
        b.effective_weight = w;
    }

    let value: f64 = buckets
        .iter()
        .map(|b| b.mean_rating.unwrap_or(0.0) * b.effective_weight / 100.0)
        .sum();

    debug!(
        reviews = reviews.len(),
        strategy = ?opts.strategy,
        edges = ?edges,
        value,
        "time-weighted rating"
    );

    Ok(TimeWeightedRating {
        value,
        strategy: opts.strategy,
        buckets,
        diagnostics,
    })
}

fn checked_ratings(reviews: &[Review], range: &RatingRange) -> Result<Vec<f64>, ScoringError> {
    reviews
        .iter()
        .enumerate()
        .map(|(pos, r)| r.validate_rating_and_age(pos, range).map(|_| r.rating))
        .collect()
}

fn empty_collection() -> ScoringError {
    ScoringError::invalid_input("reviews", "[]", "at least one review is required")
}
