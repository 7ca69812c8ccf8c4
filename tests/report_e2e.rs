// tests/report_e2e.rs
//
// File → reviews → report, the way the CLI wires it.

use chrono::NaiveDate;
use review_rank::ingest::load_reviews_from;
use review_rank::{build_report, EngineConfig, PartitionStrategy, ScoringError};
use std::fs;

fn reference() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(2014, 12, 8)
}

const ROWS: &str = r#"[
  {"reviewerID":"A","overall":5,"day_diff":30,"helpful_yes":1952,"total_vote":2020},
  {"reviewerID":"B","overall":4,"day_diff":300,"helpful_yes":45,"total_vote":49},
  {"reviewerID":"C","overall":3,"day_diff":600,"helpful_yes":1,"total_vote":1},
  {"reviewerID":"D","overall":1,"posted":"2012-01-01","helpful_yes":60,"total_vote":68},
  {"reviewerID":"E","overall":5,"day_diff":10,"helpful_yes":0,"total_vote":0}
]"#;

#[test]
fn report_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("reviews.json");
    fs::write(&p, ROWS).unwrap();

    let reviews = load_reviews_from(&p, reference()).unwrap();
    assert_eq!(reviews.len(), 5);
    assert!(reviews[3].age_days > 750.0);

    let mut cfg = EngineConfig::default();
    cfg.scoring.top_n = 3;
    let rep = build_report(&reviews, &cfg).unwrap();

    assert_eq!(rep.review_count, 5);
    assert!((rep.average_rating - 3.6).abs() < 1e-12);
    // buckets: {A,E}=5, {B}=4, {C}=3, {D}=1
    let expected = 5.0 * 0.4 + 4.0 * 0.3 + 3.0 * 0.2 + 1.0 * 0.1;
    assert!((rep.time_weighted.value - expected).abs() < 1e-12);

    let order: Vec<_> = rep
        .top_reviews
        .iter()
        .map(|r| r.id.clone().unwrap())
        .collect();
    assert_eq!(order, vec!["A", "B", "D"]);

    // The report is what the CLI prints.
    let json = serde_json::to_value(&rep).unwrap();
    assert!(json["top_reviews"][0]["wilson_lower_bound"].as_f64().unwrap() > 0.9);
    assert_eq!(json["time_weighted"]["strategy"], "fixed");
}

#[test]
fn quantile_report_differs_from_fixed() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("reviews.json");
    fs::write(&p, ROWS).unwrap();
    let reviews = load_reviews_from(&p, reference()).unwrap();

    let fixed = build_report(&reviews, &EngineConfig::default()).unwrap();
    let mut cfg = EngineConfig::default();
    cfg.aggregate.strategy = PartitionStrategy::Quantile;
    let quant = build_report(&reviews, &cfg).unwrap();

    assert_eq!(fixed.top_reviews, quant.top_reviews);
    assert_ne!(fixed.time_weighted.value, quant.time_weighted.value);
}

#[test]
fn malformed_votes_surface_as_invalid_input() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("reviews.jsonl");
    fs::write(
        &p,
        "{\"overall\":5,\"day_diff\":1,\"helpful_yes\":3,\"total_vote\":5}\n\
         {\"overall\":5,\"day_diff\":2,\"helpful_yes\":-2,\"total_vote\":5}\n",
    )
    .unwrap();
    let reviews = load_reviews_from(&p, reference()).unwrap();
    let err = build_report(&reviews, &EngineConfig::default()).unwrap_err();
    match err {
        ScoringError::InvalidInput { field, value, .. } => {
            assert_eq!(field, "reviews[1].helpful_yes");
            assert_eq!(value, "-2");
        }
        other => panic!("unexpected: {other:?}"),
    }
}
