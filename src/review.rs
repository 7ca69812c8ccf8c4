//! # Review
//! One row of input: star rating, age and helpfulness votes.
//!
//! Vote counts are signed on purpose: a loader may hand us `-1` from a broken
//! export, and that has to surface as `InvalidInput` instead of wrapping or
//! being clamped away.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ScoringError;

/// A single product review. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    /// Optional external identifier (reviewer id, row key, ...).
    #[serde(default, alias = "reviewerID", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Star rating.
    #[serde(alias = "overall")]
    pub rating: f64,
    /// Days elapsed since posting, relative to the reference "now".
    #[serde(alias = "day_diff")]
    pub age_days: f64,
    pub helpful_yes: i64,
    pub total_vote: i64,
}

impl Review {
    pub fn new(rating: f64, age_days: f64, helpful_yes: i64, total_vote: i64) -> Self {
        Self {
            id: None,
            rating,
            age_days,
            helpful_yes,
            total_vote,
        }
    }

    /// Builder-style identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Convenience for vote-only fixtures: neutral rating, age 0.
    pub fn from_votes(up: i64, down: i64) -> Self {
        Self::new(5.0, 0.0, up, up + down)
    }

    /// `total_vote - helpful_yes`. Meaningful only for validated reviews.
    #[inline]
    pub fn helpful_no(&self) -> i64 {
        self.total_vote - self.helpful_yes
    }

    /// Check the vote invariants only. Used by the scorer, which does not
    /// care about rating or age.
    pub fn validate_votes(&self, position: usize) -> Result<(), ScoringError> {
        if self.helpful_yes < 0 {
            return Err(ScoringError::invalid_input(
                field(position, "helpful_yes"),
                self.helpful_yes,
                "vote count must be non-negative",
            ));
        }
        if self.total_vote < 0 {
            return Err(ScoringError::invalid_input(
                field(position, "total_vote"),
                self.total_vote,
                "vote count must be non-negative",
            ));
        }
        if self.total_vote < self.helpful_yes {
            return Err(ScoringError::invalid_input(
                field(position, "total_vote"),
                self.total_vote,
                format!("must be >= helpful_yes ({})", self.helpful_yes),
            ));
        }
        Ok(())
    }

    /// Check rating and age. Used by the aggregator.
    pub fn validate_rating_and_age(
        &self,
        position: usize,
        range: &RatingRange,
    ) -> Result<(), ScoringError> {
        if !self.rating.is_finite() || !range.contains(self.rating) {
            return Err(ScoringError::invalid_input(
                field(position, "rating"),
                self.rating,
                format!("must be within [{}, {}]", range.min, range.max),
            ));
        }
        if !self.age_days.is_finite() || self.age_days < 0.0 {
            return Err(ScoringError::invalid_input(
                field(position, "age_days"),
                self.age_days,
                "must be a non-negative number of days",
            ));
        }
        Ok(())
    }

    /// Full validation of all four base fields.
    pub fn validate(&self, position: usize, range: &RatingRange) -> Result<(), ScoringError> {
        self.validate_votes(position)?;
        self.validate_rating_and_age(position, range)
    }
}

fn field(position: usize, name: &str) -> String {
    format!("reviews[{position}].{name}")
}

/// Inclusive bounds for the star rating.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingRange {
    pub min: f64,
    pub max: f64,
}

impl Default for RatingRange {
    fn default() -> Self {
        Self { min: 1.0, max: 5.0 }
    }
}

impl RatingRange {
    #[inline]
    pub fn contains(&self, rating: f64) -> bool {
        rating >= self.min && rating <= self.max
    }

    pub fn validate(&self) -> Result<(), ScoringError> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min > self.max {
            return Err(ScoringError::invalid_config(
                "reviews.rating_range",
                format!("[{}, {}]", self.min, self.max),
                "bounds must be finite with min <= max",
            ));
        }
        Ok(())
    }
}

/// Days between posting and the reference date, as used for `age_days`.
pub fn age_days_between(posted: NaiveDate, reference: NaiveDate) -> Result<f64, ScoringError> {
    let days = reference.signed_duration_since(posted).num_days();
    if days < 0 {
        return Err(ScoringError::invalid_input(
            "posted",
            posted,
            format!("posted after reference date {reference}"),
        ));
    }
    Ok(days as f64)
}
