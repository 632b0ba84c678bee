//! Review-level helpers used by the renderers.

use crate::models::{Review, Sentiment};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which review cards to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewFilter {
    #[default]
    All,
    Positive,
    Neutral,
    Negative,
    Bot,
}

impl ReviewFilter {
    pub fn matches(&self, review: &Review) -> bool {
        match self {
            ReviewFilter::All => true,
            ReviewFilter::Bot => review.is_bot(),
            ReviewFilter::Positive => review.sentiment == Sentiment::Positive,
            ReviewFilter::Neutral => review.sentiment == Sentiment::Neutral,
            ReviewFilter::Negative => review.sentiment == Sentiment::Negative,
        }
    }
}

impl FromStr for ReviewFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(ReviewFilter::All),
            "positive" => Ok(ReviewFilter::Positive),
            "neutral" => Ok(ReviewFilter::Neutral),
            "negative" => Ok(ReviewFilter::Negative),
            "bot" | "bots" => Ok(ReviewFilter::Bot),
            other => Err(format!(
                "Unknown review filter '{}' (expected all, positive, neutral, negative or bot)",
                other
            )),
        }
    }
}

impl fmt::Display for ReviewFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewFilter::All => write!(f, "all"),
            ReviewFilter::Positive => write!(f, "positive"),
            ReviewFilter::Neutral => write!(f, "neutral"),
            ReviewFilter::Negative => write!(f, "negative"),
            ReviewFilter::Bot => write!(f, "bot"),
        }
    }
}

/// Reviews passing the filter, in order.
pub fn filter_reviews<'a>(reviews: &'a [Review], filter: ReviewFilter) -> Vec<&'a Review> {
    reviews.iter().filter(|r| filter.matches(r)).collect()
}

/// Coarse band of a bot score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotScoreLevel {
    Low,
    Medium,
    High,
}

impl BotScoreLevel {
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=30 => BotScoreLevel::Low,
            31..=60 => BotScoreLevel::Medium,
            _ => BotScoreLevel::High,
        }
    }
}

/// First two characters of the author, uppercased ("U" when anonymous).
pub fn author_initials(author: &str) -> String {
    let author = author.trim();
    let source = if author.is_empty() { "U" } else { author };
    source.chars().take(2).collect::<String>().to_uppercase()
}

/// Filled and empty stars for a rating.
pub fn rating_stars(rating: u8) -> String {
    let filled = rating.min(5) as usize;
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

/// Text bar of `width` cells filled in proportion to `percent`.
pub fn score_bar(percent: u64, width: usize) -> String {
    let filled = ((percent.min(100) as usize) * width + 50) / 100;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}
