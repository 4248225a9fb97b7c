//! Sentiment scoring
//!
//! Compound polarity comes from the VADER lexicon and rules
//! (`vader_sentiment`). This module only maps the score onto the three
//! sentiment buckets used by the decision table.

use crate::models::Sentiment;
use vader_sentiment::SentimentIntensityAnalyzer;

/// Compound score at or above which a text is Positive
pub const POSITIVE_THRESHOLD: f64 = 0.05;
/// Compound score at or below which a text is Negative
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

const COMPOUND_KEY: &str = "compound";

/// Stateless sentiment analyzer over the VADER lexicon
pub struct SentimentAnalyzer;

impl SentimentAnalyzer {
    /// Compound polarity score in [-1, 1]
    pub fn compound_score(text: &str) -> f64 {
        if text.trim().is_empty() {
            return 0.0;
        }

        SentimentIntensityAnalyzer::new()
            .polarity_scores(text)
            .get(COMPOUND_KEY)
            .copied()
            .unwrap_or(0.0)
    }

    pub fn analyze(text: &str) -> Sentiment {
        Self::from_compound(Self::compound_score(text))
    }

    pub fn from_compound(score: f64) -> Sentiment {
        if score >= POSITIVE_THRESHOLD {
            Sentiment::Positive
        } else if score <= NEGATIVE_THRESHOLD {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }
}
