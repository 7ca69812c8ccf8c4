//! # Report Engine
//! Pure, testable orchestration: `(reviews, config)` → `ProductReport`.
//! No I/O, suitable for unit tests and offline evaluation.
//!
//! Order: validate the whole configuration, then run the time-weighted
//! aggregator and the Wilson ranking. Either failing aborts the report; no
//! partial report is returned.

use serde::Serialize;
use tracing::info;

use crate::analyze::rank::{rank_reviews, RankedReview, SortKey};
use crate::config::EngineConfig;
use crate::error::ScoringError;
use crate::review::Review;
use crate::time_weighted::{average_rating, time_weighted_average, TimeWeightedRating};

/// Everything the reporter prints for one product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductReport {
    pub review_count: usize,
    /// Plain mean of all ratings.
    pub average_rating: f64,
    pub time_weighted: TimeWeightedRating,
    /// Confidence level used for the bounds below.
    pub confidence: f64,
    /// Reviews to display, always ranked by Wilson lower bound.
    pub top_reviews: Vec<RankedReview>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<ComparisonRanking>,
}

/// Same top-N routine keyed on another score, for side-by-side inspection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRanking {
    pub key: SortKey,
    pub reviews: Vec<RankedReview>,
}

impl ProductReport {
    /// Time-weighted minus plain average. Positive when recent reviews are
    /// better than the overall history.
    pub fn recency_shift(&self) -> f64 {
        self.time_weighted.value - self.average_rating
    }
}

/// Build the full report. Deterministic for identical input and config.
pub fn build_report(reviews: &[Review], cfg: &EngineConfig) -> Result<ProductReport, ScoringError> {
    cfg.validate()?;

    let range = cfg.rating_range();
    // Report the first bad review in input order, whichever field is wrong.
    for (pos, r) in reviews.iter().enumerate() {
        r.validate(pos, &range)?;
    }

    let average = average_rating(reviews, &range)?;
    let time_weighted = time_weighted_average(reviews, &cfg.time_weight_options())?;
    let top_reviews = rank_reviews(reviews, &cfg.rank_options())?;
    let comparison = cfg
        .comparison_options()
        .map(|opts| {
            rank_reviews(reviews, &opts).map(|ranked| ComparisonRanking {
                key: opts.key,
                reviews: ranked,
            })
        })
        .transpose()?;

    info!(
        reviews = reviews.len(),
        average,
        time_weighted = time_weighted.value,
        shown = top_reviews.len(),
        "product report built"
    );

    Ok(ProductReport {
        review_count: reviews.len(),
        average_rating: average,
        time_weighted,
        confidence: cfg.scoring.confidence,
        top_reviews,
        comparison,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Review> {
        vec![
            Review::new(5.0, 100.0, 10, 10),
            Review::new(3.0, 400.0, 5, 10),
            Review::new(4.0, 600.0, 1, 1),
            Review::new(1.0, 900.0, 0, 0),
        ]
    }

    #[test]
    fn report_combines_both_components() {
        let rep = build_report(&sample(), &EngineConfig::default()).unwrap();
        assert_eq!(rep.review_count, 4);
        assert!((rep.average_rating - 3.25).abs() < 1e-12);
        let expected = 5.0 * 0.4 + 3.0 * 0.3 + 4.0 * 0.2 + 1.0 * 0.1;
        assert!((rep.time_weighted.value - expected).abs() < 1e-12);
        assert!(rep.recency_shift() > 0.0);
        assert_eq!(rep.top_reviews.len(), 4);
        assert_eq!(rep.top_reviews[0].position, 0);
    }

    #[test]
    fn compare_by_adds_side_list_without_reordering_display() {
        let mut cfg = EngineConfig::default();
        cfg.scoring.compare_by = Some(SortKey::AverageRating);
        let rep = build_report(&sample(), &cfg).unwrap();

        let display: Vec<_> = rep.top_reviews.iter().map(|r| r.position).collect();
        let baseline = build_report(&sample(), &EngineConfig::default()).unwrap();
        let expected: Vec<_> = baseline.top_reviews.iter().map(|r| r.position).collect();
        assert_eq!(display, expected);
        assert!(baseline.comparison.is_none());

        let cmp = rep.comparison.expect("comparison list");
        assert_eq!(cmp.key, SortKey::AverageRating);
        // 1/1 ties 10/10 at 1.0 and keeps input order behind it.
        let order: Vec<_> = cmp.reviews.iter().map(|r| r.position).collect();
        assert_eq!(order[..2], [0, 2]);
        // Display puts the 5/10 review ahead of the single vote.
        assert_eq!(display[..3], [0, 1, 2]);
    }

    #[test]
    fn invalid_config_reported_before_bad_input() {
        let mut cfg = EngineConfig::default();
        cfg.scoring.top_n = 0;
        let bad = vec![Review::new(9.0, -1.0, -1, -5)];
        assert!(matches!(
            build_report(&bad, &cfg),
            Err(ScoringError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn first_bad_review_wins_across_fields() {
        let mut reviews = sample();
        reviews.insert(1, Review::new(4.0, 10.0, 3, 2));
        reviews.insert(2, Review::new(9.0, 10.0, 0, 0));
        let err = build_report(&reviews, &EngineConfig::default()).unwrap_err();
        assert!(err.to_string().contains("reviews[1].total_vote"));
    }

    #[test]
    fn bad_votes_abort_whole_report() {
        let mut reviews = sample();
        reviews.push(Review::new(4.0, 10.0, 3, 2));
        let err = build_report(&reviews, &EngineConfig::default()).unwrap_err();
        assert!(err.to_string().contains("reviews[4].total_vote"));
    }
}
