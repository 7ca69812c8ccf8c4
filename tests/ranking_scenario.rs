// tests/ranking_scenario.rs
//
// End-to-end ranking behaviour: Wilson vs raw ratio, stable ties, shuffled input.

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use review_rank::{rank_reviews, top_reviews, RankOptions, Review, SortKey};

fn three() -> Vec<Review> {
    vec![
        Review::from_votes(10, 0).with_id("ten-zero"),
        Review::from_votes(5, 5).with_id("five-five"),
        Review::from_votes(1, 0).with_id("one-zero"),
    ]
}

fn ids(rows: &[review_rank::RankedReview]) -> Vec<String> {
    rows.iter().map(|r| r.id.clone().unwrap_or_default()).collect()
}

#[test]
fn wilson_puts_confident_positive_first_and_distrusts_single_vote() {
    let ranked = top_reviews(&three(), 20).unwrap();
    assert_eq!(ranked[0].id.as_deref(), Some("ten-zero"));

    // The single vote gets no credit for its perfect ratio.
    let one = ranked.iter().find(|r| r.id.as_deref() == Some("one-zero")).unwrap();
    let five = ranked.iter().find(|r| r.id.as_deref() == Some("five-five")).unwrap();
    assert!(one.scores.wilson_lower_bound < ranked[0].scores.wilson_lower_bound);
    assert!(one.scores.wilson_lower_bound < one.scores.score_average_rating);
    assert!((five.scores.wilson_lower_bound - 0.2366).abs() < 1e-3);
    assert!((one.scores.wilson_lower_bound - 0.2065).abs() < 1e-3);
}

#[test]
fn average_rating_cannot_tell_one_vote_from_ten() {
    let opts = RankOptions {
        key: SortKey::AverageRating,
        ..RankOptions::default()
    };
    let ranked = rank_reviews(&three(), &opts).unwrap();
    // 1/1 ties 10/10 at 1.0 and beats 5/10; the tie falls back to input order.
    assert_eq!(ids(&ranked), vec!["ten-zero", "one-zero", "five-five"]);
    assert_eq!(ranked[0].scores.score_average_rating, 1.0);
    assert_eq!(ranked[1].scores.score_average_rating, 1.0);
    assert_eq!(ranked[2].scores.score_average_rating, 0.5);
}

#[test]
fn auxiliary_scores_exposed() {
    let ranked = top_reviews(&three(), 20).unwrap();
    let five = ranked.iter().find(|r| r.id.as_deref() == Some("five-five")).unwrap();
    assert_eq!(five.scores.score_pos_neg_diff, 0);
    assert_eq!(five.scores.helpful_no, 5);
    assert_eq!(five.scores.score_net_ratio, 0.0);
}

#[test]
fn equal_bounds_keep_input_order_under_any_shuffle() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut base: Vec<Review> = (0..40)
        .map(|i| Review::from_votes((i % 4) as i64, 2).with_id(format!("r{i}")))
        .collect();

    for _ in 0..5 {
        base.shuffle(&mut rng);
        let ranked = top_reviews(&base, base.len()).unwrap();

        // Descending by bound, ascending by input position within equal bounds.
        for pair in ranked.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(a.scores.wilson_lower_bound >= b.scores.wilson_lower_bound);
            if a.scores.wilson_lower_bound == b.scores.wilson_lower_bound {
                assert!(a.position < b.position);
            }
        }
    }
}

#[test]
fn repeated_runs_identical() {
    let reviews: Vec<Review> = (0..500)
        .map(|i| Review::from_votes((i * 7 % 31) as i64, (i * 3 % 17) as i64))
        .collect();
    let a = top_reviews(&reviews, 20).unwrap();
    let b = top_reviews(&reviews, 20).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.len(), 20);
}
