//! Data models for the review dashboard.
//!
//! These mirror the JSON records served by the analysis service. Every
//! field may be missing on the wire; accessors supply the zero/empty value
//! so callers never have to repeat the defaulting themselves.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::ops::AddAssign;

/// Category ids the dashboard has named buckets for, with display name and icon.
pub const KNOWN_CATEGORIES: &[(&str, &str, &str)] = &[
    ("salud", "Salud", "🏥"),
    ("gastronomia", "Gastronomía", "🍽️"),
    ("hospedaje", "Hospedaje", "🏨"),
    ("retail", "Retail", "🛒"),
    ("educacion", "Educación", "🎓"),
];

/// Icon shown for businesses without a category.
pub const FALLBACK_ICON: &str = "📍";

/// Deserialize a value treating `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Non-negative whole count; accepts integral floats and rounds other floats.
fn count_from_value(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f.round() as u64)
        }),
        _ => None,
    }
}

/// Deserialize a count, mapping negatives, strings and other odd values to zero.
fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(count_from_value).unwrap_or_default())
}

/// Like [`lenient_count`], but an unusable value stays absent.
fn lenient_optional_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(count_from_value))
}

/// Deserialize a signed score, rounding floats; anything else is absent.
fn lenient_score<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite())
                .map(|f| f.round() as i64)
        }),
        _ => None,
    })
}

/// Deserialize a float, treating non-numeric values as absent.
fn lenient_float<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Value::as_f64))
}

/// Classification bucket assigned to a business by the service.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Category {
    #[serde(default, deserialize_with = "null_as_default")]
    pub category_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub icon: String,
}

/// Information about a category as listed by `GET /categories`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: String,
}

impl CategoryInfo {
    /// The built-in category table, used when the service can't be asked.
    pub fn builtin() -> Vec<CategoryInfo> {
        KNOWN_CATEGORIES
            .iter()
            .map(|(id, name, icon)| CategoryInfo {
                id: id.to_string(),
                name: name.to_string(),
                icon: icon.to_string(),
            })
            .collect()
    }
}

/// Positive/neutral/negative review counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SentimentSummary {
    #[serde(default, deserialize_with = "lenient_count")]
    pub positive: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub neutral: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub negative: u64,
}

impl SentimentSummary {
    pub fn total(&self) -> u64 {
        self.positive
            .saturating_add(self.neutral)
            .saturating_add(self.negative)
    }
}

impl AddAssign for SentimentSummary {
    fn add_assign(&mut self, other: Self) {
        self.positive = self.positive.saturating_add(other.positive);
        self.neutral = self.neutral.saturating_add(other.neutral);
        self.negative = self.negative.saturating_add(other.negative);
    }
}

/// Real/suspicious/bot classification counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BotStats {
    #[serde(default, deserialize_with = "lenient_count")]
    pub real: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub suspicious: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub bot: u64,
}

impl AddAssign for BotStats {
    fn add_assign(&mut self, other: Self) {
        self.real = self.real.saturating_add(other.real);
        self.suspicious = self.suspicious.saturating_add(other.suspicious);
        self.bot = self.bot.saturating_add(other.bot);
    }
}

/// Sentiment derived for a single review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
    #[default]
    #[serde(other)]
    Unknown,
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sentiment::Positive => write!(f, "Positive"),
            Sentiment::Neutral => write!(f, "Neutral"),
            Sentiment::Negative => write!(f, "Negative"),
            Sentiment::Unknown => write!(f, "Unknown"),
        }
    }
}

impl Sentiment {
    /// Returns an emoji representation of the sentiment.
    pub fn emoji(&self) -> &'static str {
        match self {
            Sentiment::Positive => "😊",
            Sentiment::Neutral => "😐",
            Sentiment::Negative => "😞",
            Sentiment::Unknown => "❔",
        }
    }
}

/// Bot-likelihood bucket for a single review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BotClassification {
    Real,
    Suspicious,
    Bot,
    #[default]
    #[serde(other)]
    Unknown,
}

impl fmt::Display for BotClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BotClassification::Real => write!(f, "Real"),
            BotClassification::Suspicious => write!(f, "Suspicious"),
            BotClassification::Bot => write!(f, "Bot"),
            BotClassification::Unknown => write!(f, "Unknown"),
        }
    }
}

/// A signal that contributed to a review's bot score.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BotIndicator {
    SingleReview,
    ShortText,
    GenericPhrases,
    NoDetails,
    ExtremeRating,
    LowConfidence,
    Other(String),
}

impl BotIndicator {
    /// Human-readable label for the indicator.
    pub fn label(&self) -> &str {
        match self {
            BotIndicator::SingleReview => "1 review",
            BotIndicator::ShortText => "Short text",
            BotIndicator::GenericPhrases => "Generic phrase",
            BotIndicator::NoDetails => "No details",
            BotIndicator::ExtremeRating => "Extreme rating",
            BotIndicator::LowConfidence => "Low confidence",
            BotIndicator::Other(tag) => tag,
        }
    }
}

impl From<String> for BotIndicator {
    fn from(s: String) -> Self {
        match s.as_str() {
            "single_review" => BotIndicator::SingleReview,
            "short_text" => BotIndicator::ShortText,
            "generic_phrases" => BotIndicator::GenericPhrases,
            "no_details" => BotIndicator::NoDetails,
            "extreme_rating" => BotIndicator::ExtremeRating,
            "low_confidence" => BotIndicator::LowConfidence,
            _ => BotIndicator::Other(s),
        }
    }
}

impl From<BotIndicator> for String {
    fn from(indicator: BotIndicator) -> Self {
        match indicator {
            BotIndicator::SingleReview => "single_review".to_string(),
            BotIndicator::ShortText => "short_text".to_string(),
            BotIndicator::GenericPhrases => "generic_phrases".to_string(),
            BotIndicator::NoDetails => "no_details".to_string(),
            BotIndicator::ExtremeRating => "extreme_rating".to_string(),
            BotIndicator::LowConfidence => "low_confidence".to_string(),
            BotIndicator::Other(tag) => tag,
        }
    }
}

/// One user-submitted review with its derived classifications.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Review {
    #[serde(default, deserialize_with = "null_as_default")]
    pub author: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(
        default,
        deserialize_with = "lenient_float",
        skip_serializing_if = "Option::is_none"
    )]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sentiment: Sentiment,
    #[serde(
        default,
        deserialize_with = "lenient_float",
        skip_serializing_if = "Option::is_none"
    )]
    pub confidence: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_score",
        skip_serializing_if = "Option::is_none"
    )]
    pub bot_score: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub bot_classification: BotClassification,
    #[serde(default, deserialize_with = "null_as_default")]
    pub bot_indicators: Vec<BotIndicator>,
}

impl Review {
    /// Star rating clamped to 0..=5.
    pub fn rating(&self) -> u8 {
        self.rating.unwrap_or_default().round().clamp(0.0, 5.0) as u8
    }

    /// Bot score clamped to 0..=100.
    pub fn bot_score(&self) -> u8 {
        self.bot_score.unwrap_or_default().clamp(0, 100) as u8
    }

    pub fn is_bot(&self) -> bool {
        self.bot_classification == BotClassification::Bot
    }
}

/// One analyzed business with its sentiment/bot profile and reviews.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Business {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(
        default,
        deserialize_with = "lenient_optional_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_reviews: Option<u64>,
    #[serde(
        default,
        deserialize_with = "lenient_float",
        skip_serializing_if = "Option::is_none"
    )]
    pub average_rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment_summary: Option<SentimentSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot_stats: Option<BotStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews: Option<Vec<Review>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyzed_at: Option<String>,
}

impl Business {
    pub fn total_reviews(&self) -> u64 {
        self.total_reviews.unwrap_or_default()
    }

    pub fn sentiment(&self) -> SentimentSummary {
        self.sentiment_summary.unwrap_or_default()
    }

    pub fn bots(&self) -> BotStats {
        self.bot_stats.unwrap_or_default()
    }

    pub fn reviews(&self) -> &[Review] {
        self.reviews.as_deref().unwrap_or_default()
    }

    /// Category id, if the business has one.
    pub fn category_id(&self) -> Option<&str> {
        self.category.as_ref().map(|c| c.category_id.as_str())
    }

    pub fn category_name(&self) -> Option<&str> {
        self.category.as_ref().map(|c| c.category_name.as_str())
    }

    pub fn icon(&self) -> &str {
        self.category
            .as_ref()
            .map(|c| c.icon.as_str())
            .filter(|icon| !icon.is_empty())
            .unwrap_or(FALLBACK_ICON)
    }

    /// Parse `analyzed_at`, accepting RFC 3339 and naive ISO 8601 timestamps.
    pub fn analyzed_at(&self) -> Option<NaiveDateTime> {
        let raw = self.analyzed_at.as_deref()?;
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.naive_utc())
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"))
            .ok()
    }
}

/// Envelope returned by `GET /history` and `GET /mock-analysis`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub businesses: Vec<Business>,
    #[serde(
        default,
        deserialize_with = "lenient_optional_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub total: Option<u64>,
}

/// Body of `POST /analyze`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub url: String,
    pub business_name: Option<String>,
}

impl AnalyzeRequest {
    /// Build a request, trimming input and mapping a blank name to `None`.
    pub fn new(url: &str, business_name: Option<&str>) -> Self {
        Self {
            url: url.trim().to_string(),
            business_name: business_name
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(String::from),
        }
    }
}

/// Response of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub version: Option<String>,
}
