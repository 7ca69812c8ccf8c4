// src/lib.rs
//! Review ranking and time-weighted product ratings.
//!
//! Two independent pure components over a slice of [`Review`]s:
//!
//! - [`time_weighted::time_weighted_average`]: recency-bucketed weighted mean rating.
//! - [`analyze::rank_reviews`]: per-review Wilson lower bound plus baseline
//!   scores, ranked with stable tie-breaking.
//!
//! [`engine::build_report`] runs both against an [`EngineConfig`].
//!
//! ```
//! use review_rank::{build_report, EngineConfig, Review};
//!
//! let reviews = vec![
//!     Review::new(5.0, 30.0, 10, 10),
//!     Review::new(4.0, 420.0, 5, 10),
//!     Review::new(2.0, 800.0, 1, 1),
//! ];
//! let report = build_report(&reviews, &EngineConfig::default())?;
//! assert_eq!(report.top_reviews[0].position, 0);
//! # Ok::<(), review_rank::ScoringError>(())
//! ```

pub mod analyze;
pub mod config;
pub mod engine;
pub mod error;
pub mod review;
pub mod stats;
pub mod time_weighted;

// Loader used by the CLI (I/O lives outside the core).
pub mod ingest;

// ---- Re-exports for stable public API ----
pub use crate::analyze::{
    rank_reviews, top_reviews, wilson_lower_bound, BucketWeights, RankOptions, RankedReview,
    ScoreBundle, SortKey,
};
pub use crate::config::EngineConfig;
pub use crate::engine::{build_report, ComparisonRanking, ProductReport};
pub use crate::error::ScoringError;
pub use crate::review::{RatingRange, Review};
pub use crate::time_weighted::{
    average_rating, time_weighted_average, EmptyBucketPolicy, PartitionStrategy,
    TimeWeightOptions, TimeWeightedRating,
};
