//! Per-review helpfulness scores.
//!
//! The ranking key is the lower bound of the Wilson score interval:
//!
//! ```text
//! bound = (p + z²/2n − z·sqrt((p(1−p) + z²/4n) / n)) / (1 + z²/n)
//! ```
//!
//! with `p = up/n` and `z` the two-sided normal critical value for the chosen
//! confidence. With no votes the bound is 0.
//!
//! `pos_neg_diff`, `average_rating` and `net_ratio` are kept next to it for
//! comparison only; none of them is stable at low vote counts.

use serde::Serialize;

use crate::error::ScoringError;
use crate::review::Review;
use crate::stats::two_sided_z;

/// Default confidence level for the Wilson bound.
pub const DEFAULT_CONFIDENCE: f64 = 0.95;

/// Wilson lower bound for `up` helpful and `down` unhelpful votes.
pub fn wilson_lower_bound(up: i64, down: i64, confidence: f64) -> Result<f64, ScoringError> {
    let z = two_sided_z(confidence)?;
    if up < 0 {
        return Err(ScoringError::invalid_input(
            "helpful_yes",
            up,
            "vote count must be non-negative",
        ));
    }
    if down < 0 {
        return Err(ScoringError::invalid_input(
            "helpful_no",
            down,
            "vote count must be non-negative",
        ));
    }
    Ok(wilson_with_z(up as u64, down as u64, z))
}

/// Same as [`wilson_lower_bound`] with a precomputed critical value.
/// Lets a batch resolve `z` once.
pub fn wilson_with_z(up: u64, down: u64, z: f64) -> f64 {
    let n = up as f64 + down as f64;
    if n == 0.0 {
        return 0.0;
    }
    let phat = up as f64 / n;
    let z2 = z * z;
    let centre = phat + z2 / (2.0 * n);
    let margin = z * ((phat * (1.0 - phat) + z2 / (4.0 * n)) / n).sqrt();
    // Rounding can leave -1e-17 at p = 0.
    ((centre - margin) / (1.0 + z2 / n)).clamp(0.0, 1.0)
}

/// Net vote count. Unbounded, not comparable across vote totals.
#[inline]
pub fn score_pos_neg_diff(up: i64, down: i64) -> i64 {
    up - down
}

/// Raw helpful ratio; 0 when nobody voted.
#[inline]
pub fn score_average_rating(up: i64, total: i64) -> f64 {
    if total == 0 {
        0.0
    } else {
        up as f64 / total as f64
    }
}

/// Net votes over total votes, in [-1, 1]; 0 when nobody voted.
#[inline]
pub fn score_net_ratio(up: i64, total: i64) -> f64 {
    if total == 0 {
        0.0
    } else {
        score_pos_neg_diff(up, total - up) as f64 / total as f64
    }
}

/// All derived scores for one review.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBundle {
    pub helpful_yes: i64,
    pub helpful_no: i64,
    pub total_vote: i64,
    pub wilson_lower_bound: f64,
    pub score_pos_neg_diff: i64,
    pub score_average_rating: f64,
    pub score_net_ratio: f64,
}

impl ScoreBundle {
    /// Score an already validated review with a resolved critical value.
    pub fn from_validated(review: &Review, z: f64) -> Self {
        let up = review.helpful_yes;
        let down = review.helpful_no();
        Self {
            helpful_yes: up,
            helpful_no: down,
            total_vote: review.total_vote,
            wilson_lower_bound: wilson_with_z(up as u64, down as u64, z),
            score_pos_neg_diff: score_pos_neg_diff(up, down),
            score_average_rating: score_average_rating(up, review.total_vote),
            score_net_ratio: score_net_ratio(up, review.total_vote),
        }
    }
}

/// Validate and score a single review at `position` in its collection.
pub fn score_review(
    review: &Review,
    position: usize,
    confidence: f64,
) -> Result<ScoreBundle, ScoringError> {
    let z = two_sided_z(confidence)?;
    review.validate_votes(position)?;
    Ok(ScoreBundle::from_validated(review, z))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wlb(up: i64, down: i64) -> f64 {
        wilson_lower_bound(up, down, DEFAULT_CONFIDENCE).unwrap()
    }

    #[test]
    fn huge_counts_do_not_overflow() {
        let b = wilson_with_z(u64::MAX, u64::MAX, 1.96);
        assert!((b - 0.5).abs() < 1e-6);
        assert!(wilson_with_z(u64::MAX, 0, 1.96) > 0.999_999);
    }

    #[test]
    fn no_votes_means_zero() {
        assert_eq!(wlb(0, 0), 0.0);
    }

    #[test]
    fn known_values() {
        // 1 / (1 + z²/10) with z = 1.959963985
        assert!((wlb(10, 0) - 0.722_467).abs() < 1e-5);
        assert!((wlb(5, 5) - 0.236_593).abs() < 1e-5);
        assert!((wlb(1, 0) - 0.206_549).abs() < 1e-5);
        assert_eq!(wlb(0, 10), 0.0);
    }

    #[test]
    fn negative_counts_are_errors_not_clamped() {
        assert!(matches!(
            wilson_lower_bound(-1, 3, 0.95),
            Err(ScoringError::InvalidInput { .. })
        ));
        assert!(matches!(
            wilson_lower_bound(3, -1, 0.95),
            Err(ScoringError::InvalidInput { .. })
        ));
    }

    #[test]
    fn bad_confidence_is_configuration_error() {
        assert!(matches!(
            wilson_lower_bound(3, 1, 1.0),
            Err(ScoringError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn higher_confidence_is_more_pessimistic() {
        let a = wilson_lower_bound(30, 10, 0.90).unwrap();
        let b = wilson_lower_bound(30, 10, 0.99).unwrap();
        assert!(b < a);
    }

    #[test]
    fn auxiliary_scores() {
        assert_eq!(score_pos_neg_diff(7, 3), 4);
        assert_eq!(score_average_rating(0, 0), 0.0);
        assert!((score_average_rating(7, 10) - 0.7).abs() < 1e-12);
        assert!((score_net_ratio(7, 10) - 0.4).abs() < 1e-12);
        assert_eq!(score_net_ratio(0, 0), 0.0);
    }

    #[test]
    fn bundle_reports_position_on_bad_review() {
        let r = Review::new(5.0, 1.0, 4, 2);
        let err = score_review(&r, 9, DEFAULT_CONFIDENCE).unwrap_err();
        assert!(err.to_string().contains("reviews[9].total_vote"));
    }
}
