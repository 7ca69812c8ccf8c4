// src/analyze/rank.rs
//! Ranking: score every review, then keep the top-N by a chosen key.
//!
//! - Scores are computed in parallel (`rayon`); collection preserves input order.
//! - The sort is stable and descending, so equal keys keep their input order.
//! - The default key is the Wilson lower bound. Other keys exist to compare
//!   orderings against it, not to replace it.

use rayon::prelude::*;
use serde::Serialize;
use std::cmp::Ordering;
use tracing::debug;

use super::scoring::{ScoreBundle, DEFAULT_CONFIDENCE};
use crate::error::ScoringError;
use crate::review::Review;
use crate::stats::two_sided_z;

/// Default number of reviews to display.
pub const DEFAULT_TOP_N: usize = 20;

/// Which score orders the output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    WilsonLowerBound,
    AverageRating,
    PosNegDiff,
    NetRatio,
    TotalVote,
}

impl SortKey {
    fn value(self, s: &ScoreBundle) -> f64 {
        match self {
            SortKey::WilsonLowerBound => s.wilson_lower_bound,
            SortKey::AverageRating => s.score_average_rating,
            SortKey::PosNegDiff => s.score_pos_neg_diff as f64,
            SortKey::NetRatio => s.score_net_ratio,
            SortKey::TotalVote => s.total_vote as f64,
        }
    }
}

/// Ranking parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RankOptions {
    pub confidence: f64,
    pub top_n: usize,
    pub key: SortKey,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            confidence: DEFAULT_CONFIDENCE,
            top_n: DEFAULT_TOP_N,
            key: SortKey::WilsonLowerBound,
        }
    }
}

impl RankOptions {
    pub fn validate(&self) -> Result<(), ScoringError> {
        if self.top_n == 0 {
            return Err(ScoringError::invalid_config(
                "scoring.top_n",
                self.top_n,
                "must be at least 1",
            ));
        }
        crate::stats::validate_confidence(self.confidence)
    }
}

/// One row of the ranked output.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RankedReview {
    /// 1-based rank in the output.
    pub rank: usize,
    /// 0-based position in the input collection.
    pub position: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub scores: ScoreBundle,
}

/// Validate and score every review, in input order.
///
/// On failure the error of the lowest failing position is returned, no matter
/// which worker hit it first.
pub fn score_all(reviews: &[Review], confidence: f64) -> Result<Vec<ScoreBundle>, ScoringError> {
    let z = two_sided_z(confidence)?;
    let results: Vec<Result<ScoreBundle, ScoringError>> = reviews
        .par_iter()
        .enumerate()
        .map(|(pos, r)| {
            r.validate_votes(pos)?;
            Ok(ScoreBundle::from_validated(r, z))
        })
        .collect();
    results.into_iter().collect()
}

/// Rank `reviews` and return at most `opts.top_n` rows.
///
/// Configuration is checked before any review is touched; the first invalid
/// review (lowest position) aborts the whole ranking.
pub fn rank_reviews(
    reviews: &[Review],
    opts: &RankOptions,
) -> Result<Vec<RankedReview>, ScoringError> {
    opts.validate()?;
    let scores = score_all(reviews, opts.confidence)?;

    let mut order: Vec<usize> = (0..scores.len()).collect();
    // `sort_by` is stable: ties keep ascending input position.
    order.sort_by(|&a, &b| {
        let ka = opts.key.value(&scores[a]);
        let kb = opts.key.value(&scores[b]);
        kb.partial_cmp(&ka).unwrap_or(Ordering::Equal)
    });

    let out: Vec<RankedReview> = order
        .into_iter()
        .take(opts.top_n)
        .enumerate()
        .map(|(i, pos)| RankedReview {
            rank: i + 1,
            position: pos,
            id: reviews[pos].id.clone(),
            scores: scores[pos],
        })
        .collect();

    debug!(
        reviews = reviews.len(),
        returned = out.len(),
        key = ?opts.key,
        "ranked reviews"
    );
    Ok(out)
}

/// Wilson ranking with default confidence.
pub fn top_reviews(reviews: &[Review], top_n: usize) -> Result<Vec<RankedReview>, ScoringError> {
    rank_reviews(
        reviews,
        &RankOptions {
            top_n,
            ..RankOptions::default()
        },
    )
}
