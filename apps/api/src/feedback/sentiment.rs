//! Sentiment classification: maps a submission's rating to a coarse label.
//!
//! Pure and deterministic on purpose: the label is derived from the rating
//! alone, so the same submission always classifies the same way no matter
//! which backend stored it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse sentiment label attached to every stored submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Neutral => "Neutral",
            Sentiment::Negative => "Negative",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies a rating on the usual 1-5 scale.
///
/// A rating of 4 or better is positive and 2 or worse is negative,
/// including a literal 0. No rating at all is neutral.
pub fn classify(rating: Option<i32>) -> Sentiment {
    match rating {
        None => Sentiment::Neutral,
        Some(r) if r >= 4 => Sentiment::Positive,
        Some(r) if r <= 2 => Sentiment::Negative,
        Some(_) => Sentiment::Neutral,
    }
}
