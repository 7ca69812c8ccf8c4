// src/analyze/mod.rs
//! Review confidence scoring: per-review scores, ranking and bucket weights.

pub mod rank;
pub mod scoring;
pub mod weights;

// Re-export convenient types.
pub use crate::analyze::rank::{
    rank_reviews, score_all, top_reviews, RankOptions, RankedReview, SortKey, DEFAULT_TOP_N,
};
pub use crate::analyze::scoring::{
    score_average_rating, score_net_ratio, score_pos_neg_diff, score_review, wilson_lower_bound,
    ScoreBundle, DEFAULT_CONFIDENCE,
};
pub use crate::analyze::weights::BucketWeights;
