// src/ingest.rs
//! Review loading for the CLI. Not part of the scoring core.
//!
//! Accepts a JSON array of rows or JSON Lines (one object per line). A row
//! carries either `age_days` (alias `day_diff`) or a `posted` date
//! (`YYYY-MM-DD`); dates are turned into ages against a reference date.

use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::review::{age_days_between, Review};

#[derive(Debug, Clone, Deserialize)]
struct RawReview {
    #[serde(default, alias = "reviewerID")]
    id: Option<String>,
    #[serde(alias = "overall")]
    rating: f64,
    #[serde(default, alias = "day_diff")]
    age_days: Option<f64>,
    #[serde(default)]
    posted: Option<NaiveDate>,
    helpful_yes: i64,
    total_vote: i64,
}

impl RawReview {
    fn into_review(self, line: usize, reference: NaiveDate) -> Result<Review> {
        let age_days = match (self.age_days, self.posted) {
            (Some(age), _) => age,
            (None, Some(posted)) => age_days_between(posted, reference)
                .with_context(|| format!("row {line}: deriving age from posted date"))?,
            (None, None) => return Err(anyhow!("row {line}: needs `age_days` or `posted`")),
        };
        Ok(Review {
            id: self.id,
            rating: self.rating,
            age_days,
            helpful_yes: self.helpful_yes,
            total_vote: self.total_vote,
        })
    }
}

/// Load reviews from a file; `reference` defaults to today (UTC).
pub fn load_reviews_from(path: &Path, reference: Option<NaiveDate>) -> Result<Vec<Review>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading reviews from {}", path.display()))?;
    let reviews = parse_reviews(&content, reference.unwrap_or_else(|| Utc::now().date_naive()))
        .with_context(|| format!("parsing reviews in {}", path.display()))?;
    debug!(path = %path.display(), count = reviews.len(), "loaded reviews");
    Ok(reviews)
}

/// Parse a JSON array or JSON Lines document.
pub fn parse_reviews(s: &str, reference: NaiveDate) -> Result<Vec<Review>> {
    let raws: Vec<RawReview> = if s.trim_start().starts_with('[') {
        serde_json::from_str(s)?
    } else {
        s.lines()
            .enumerate()
            .filter(|(_, l)| !l.trim().is_empty())
            .map(|(i, l)| {
                serde_json::from_str::<RawReview>(l).with_context(|| format!("line {}", i + 1))
            })
            .collect::<Result<_>>()?
    };
    raws.into_iter()
        .enumerate()
        .map(|(i, raw)| raw.into_review(i, reference))
        .collect()
}
