//! Business aggregation and statistics.
//!
//! This module combines analyzed businesses into summary statistics and
//! filters them by category. Everything here is a pure function over
//! already-computed per-business summaries.

use crate::models::{Business, BotStats, Review, SentimentSummary, KNOWN_CATEGORIES};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Id and name used to group businesses without a category.
pub const UNCATEGORIZED_ID: &str = "otros";
pub const UNCATEGORIZED_NAME: &str = "Otros";

/// A category scope: every business, or only one category id.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CategoryFilter {
    #[default]
    All,
    Id(String),
}

impl CategoryFilter {
    pub fn matches(&self, business: &Business) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Id(id) => business.category_id() == Some(id.as_str()),
        }
    }
}

impl From<&str> for CategoryFilter {
    fn from(s: &str) -> Self {
        match s.trim() {
            "" | "all" => CategoryFilter::All,
            id => CategoryFilter::Id(id.to_string()),
        }
    }
}

impl From<String> for CategoryFilter {
    fn from(s: String) -> Self {
        CategoryFilter::from(s.as_str())
    }
}

impl From<CategoryFilter> for String {
    fn from(filter: CategoryFilter) -> Self {
        filter.to_string()
    }
}

impl FromStr for CategoryFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(CategoryFilter::from(s))
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => write!(f, "all"),
            CategoryFilter::Id(id) => write!(f, "{}", id),
        }
    }
}

/// Summed counts and concatenated reviews across a set of businesses.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AggregatedStats {
    pub total_reviews: u64,
    pub sentiment: SentimentSummary,
    pub bots: BotStats,
    pub reviews: Vec<Review>,
}

/// Combine businesses into one set of statistics.
///
/// Missing fields count as zero; reviews keep their order within and
/// across businesses.
pub fn aggregate<'a, I>(businesses: I) -> AggregatedStats
where
    I: IntoIterator<Item = &'a Business>,
{
    let mut stats = AggregatedStats::default();

    for business in businesses {
        stats.total_reviews = stats.total_reviews.saturating_add(business.total_reviews());
        stats.sentiment += business.sentiment();
        stats.bots += business.bots();
        stats.reviews.extend_from_slice(business.reviews());
    }

    stats
}

/// Businesses matching the filter, in their original order.
pub fn filter_by_category<'a>(all: &'a [Business], filter: &CategoryFilter) -> Vec<&'a Business> {
    all.iter().filter(|b| filter.matches(b)).collect()
}

/// Number of businesses in one known category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category_id: String,
    pub category_name: String,
    pub icon: String,
    pub count: usize,
}

/// Business counts per known category, plus the overall total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub total: usize,
    pub by_category: Vec<CategoryCount>,
}

impl CategoryCounts {
    /// Count for a category id; `None` for ids without a named bucket.
    pub fn get(&self, category_id: &str) -> Option<usize> {
        self.by_category
            .iter()
            .find(|c| c.category_id == category_id)
            .map(|c| c.count)
    }
}

/// Count businesses per known category.
///
/// Businesses with an unknown or absent category count only toward the total.
pub fn category_counts(all: &[Business]) -> CategoryCounts {
    let mut by_category: Vec<CategoryCount> = KNOWN_CATEGORIES
        .iter()
        .map(|(id, name, icon)| CategoryCount {
            category_id: id.to_string(),
            category_name: name.to_string(),
            icon: icon.to_string(),
            count: 0,
        })
        .collect();

    for business in all {
        if let Some(id) = business.category_id() {
            if let Some(bucket) = by_category.iter_mut().find(|c| c.category_id == id) {
                bucket.count += 1;
            }
        }
    }

    CategoryCounts {
        total: all.len(),
        by_category,
    }
}

/// Sentiment totals for one category, as shown in the comparison chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySentiment {
    pub category_id: String,
    pub category_name: String,
    pub sentiment: SentimentSummary,
}

/// Group sentiment counts by category, in order of first appearance.
pub fn category_breakdown(all: &[Business]) -> Vec<CategorySentiment> {
    let mut groups: Vec<CategorySentiment> = Vec::new();

    for business in all {
        let id = business
            .category_id()
            .filter(|id| !id.is_empty())
            .unwrap_or(UNCATEGORIZED_ID);

        let index = match groups.iter().position(|g| g.category_id == id) {
            Some(index) => index,
            None => {
                let name = business
                    .category_name()
                    .filter(|name| !name.is_empty())
                    .unwrap_or(UNCATEGORIZED_NAME);
                groups.push(CategorySentiment {
                    category_id: id.to_string(),
                    category_name: name.to_string(),
                    sentiment: SentimentSummary::default(),
                });
                groups.len() - 1
            }
        };

        groups[index].sentiment += business.sentiment();
    }

    groups
}

/// Percentage of `count` over `total`, rounded; a zero total counts as one.
pub fn percentage(count: u64, total: u64) -> u64 {
    let total = u128::from(total.max(1));
    let scaled = (u128::from(count) * 100 + total / 2) / total;
    u64::try_from(scaled).unwrap_or(u64::MAX)
}

/// Real/suspicious/bot shares of the total review count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BotPercentages {
    pub real: u64,
    pub suspicious: u64,
    pub bot: u64,
}

impl BotPercentages {
    pub fn from_stats(stats: &AggregatedStats) -> Self {
        Self {
            real: percentage(stats.bots.real, stats.total_reviews),
            suspicious: percentage(stats.bots.suspicious, stats.total_reviews),
            bot: percentage(stats.bots.bot, stats.total_reviews),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    fn create_business(name: &str, category: Option<&str>, total: u64) -> Business {
        Business {
            name: name.to_string(),
            category: category.map(|id| Category {
                category_id: id.to_string(),
                category_name: id.to_uppercase(),
                icon: String::new(),
            }),
            total_reviews: Some(total),
            ..Business::default()
        }
    }

    fn create_review(author: &str) -> Review {
        Review {
            author: author.to_string(),
            ..Review::default()
        }
    }

    #[test]
    fn test_aggregate_empty() {
        let empty: Vec<Business> = Vec::new();
        let stats = aggregate(&empty);
        assert_eq!(stats.total_reviews, 0);
        assert_eq!(stats.sentiment, SentimentSummary::default());
        assert_eq!(stats.bots, BotStats::default());
        assert!(stats.reviews.is_empty());
    }

    #[test]
    fn test_aggregate_sums_sentiment() {
        let mut a = create_business("A", None, 10);
        a.sentiment_summary = Some(SentimentSummary {
            positive: 7,
            neutral: 2,
            negative: 1,
        });
        let mut b = create_business("B", None, 5);
        b.sentiment_summary = Some(SentimentSummary {
            positive: 1,
            neutral: 1,
            negative: 3,
        });

        let stats = aggregate(&[a, b]);
        assert_eq!(stats.total_reviews, 15);
        assert_eq!(
            stats.sentiment,
            SentimentSummary {
                positive: 8,
                neutral: 3,
                negative: 4,
            }
        );
    }

    #[test]
    fn test_aggregate_missing_bot_stats() {
        let mut with_bots = create_business("A", None, 4);
        with_bots.bot_stats = Some(BotStats {
            real: 2,
            suspicious: 1,
            bot: 1,
        });
        let without = create_business("B", None, 3);

        assert_eq!(aggregate(&[without.clone()]).bots, BotStats::default());
        assert_eq!(
            aggregate(&[with_bots, without]).bots,
            BotStats {
                real: 2,
                suspicious: 1,
                bot: 1,
            }
        );
    }

    #[test]
    fn test_aggregate_missing_total() {
        let mut business = create_business("A", None, 0);
        business.total_reviews = None;
        let other = create_business("B", None, 6);
        assert_eq!(aggregate(&[business, other]).total_reviews, 6);
    }

    #[test]
    fn test_aggregate_preserves_review_order() {
        let mut a = create_business("A", None, 2);
        a.reviews = Some(vec![create_review("a1"), create_review("a2")]);
        let b = create_business("B", None, 0);
        let mut c = create_business("C", None, 1);
        c.reviews = Some(vec![create_review("c1")]);

        let stats = aggregate(&[a, b, c]);
        let authors: Vec<&str> = stats.reviews.iter().map(|r| r.author.as_str()).collect();
        assert_eq!(authors, vec!["a1", "a2", "c1"]);
    }

    #[test]
    fn test_aggregate_idempotent() {
        let mut a = create_business("A", Some("retail"), 3);
        a.reviews = Some(vec![create_review("x")]);
        let businesses = vec![a, create_business("B", None, 2)];

        assert_eq!(aggregate(&businesses), aggregate(&businesses));
    }

    #[test]
    fn test_aggregate_over_filtered_refs() {
        let businesses = vec![
            create_business("A", Some("salud"), 4),
            create_business("B", Some("retail"), 9),
        ];
        let filtered = filter_by_category(&businesses, &CategoryFilter::from("retail"));
        assert_eq!(aggregate(filtered).total_reviews, 9);
    }

    #[test]
    fn test_filter_all_is_identity() {
        let businesses = vec![
            create_business("A", Some("salud"), 1),
            create_business("B", None, 1),
            create_business("C", Some("retail"), 1),
        ];
        let filtered = filter_by_category(&businesses, &CategoryFilter::All);
        let names: Vec<&str> = filtered.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_filter_by_specific_category() {
        let businesses = vec![
            create_business("A", Some("salud"), 1),
            create_business("B", Some("retail"), 1),
        ];
        let filtered = filter_by_category(&businesses, &CategoryFilter::from("retail"));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "B");
    }

    #[test]
    fn test_filter_excludes_uncategorized() {
        let businesses = vec![
            create_business("A", None, 1),
            create_business("B", Some("otros"), 1),
            create_business("C", Some("otros"), 1),
        ];
        let filtered = filter_by_category(&businesses, &CategoryFilter::from("otros"));
        let names: Vec<&str> = filtered.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["B", "C"]);
    }

    #[test]
    fn test_category_filter_parsing() {
        assert_eq!(CategoryFilter::from("all"), CategoryFilter::All);
        assert_eq!(CategoryFilter::from(" "), CategoryFilter::All);
        assert_eq!(
            "salud".parse::<CategoryFilter>().unwrap(),
            CategoryFilter::Id("salud".to_string())
        );
        assert_eq!(CategoryFilter::Id("retail".to_string()).to_string(), "retail");
    }

    #[test]
    fn test_category_counts() {
        let businesses = vec![
            create_business("A", Some("salud"), 1),
            create_business("B", Some("salud"), 1),
            create_business("C", Some("retail"), 1),
            create_business("D", Some("servicios"), 1),
            create_business("E", None, 1),
        ];

        let counts = category_counts(&businesses);
        assert_eq!(counts.total, 5);
        assert_eq!(counts.get("salud"), Some(2));
        assert_eq!(counts.get("retail"), Some(1));
        assert_eq!(counts.get("hospedaje"), Some(0));
        assert_eq!(counts.get("servicios"), None);
        let named: usize = counts.by_category.iter().map(|c| c.count).sum();
        assert_eq!(named, 3);
    }

    #[test]
    fn test_category_breakdown_groups_uncategorized() {
        let mut a = create_business("A", Some("retail"), 1);
        a.sentiment_summary = Some(SentimentSummary {
            positive: 2,
            neutral: 0,
            negative: 1,
        });
        let mut b = create_business("B", None, 1);
        b.sentiment_summary = Some(SentimentSummary {
            positive: 1,
            neutral: 1,
            negative: 0,
        });
        let mut c = create_business("C", Some("retail"), 1);
        c.sentiment_summary = Some(SentimentSummary {
            positive: 3,
            neutral: 0,
            negative: 0,
        });

        let groups = category_breakdown(&[a, b, c]);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].category_id, "retail");
        assert_eq!(groups[0].sentiment.positive, 5);
        assert_eq!(groups[1].category_id, UNCATEGORIZED_ID);
        assert_eq!(groups[1].category_name, UNCATEGORIZED_NAME);
        assert_eq!(groups[1].sentiment.neutral, 1);
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(3, 0), 300);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 2), 50);
    }

    #[test]
    fn test_percentage_large_counts() {
        assert_eq!(percentage(u64::MAX / 50, u64::MAX), 2);
        assert_eq!(percentage(u64::MAX, u64::MAX), 100);
        assert_eq!(percentage(u64::MAX, 1), u64::MAX);
    }

    #[test]
    fn test_aggregate_saturates_large_counts() {
        let mut business = create_business("Mega Plaza", Some("retail"), u64::MAX);
        business.sentiment_summary = Some(SentimentSummary {
            positive: u64::MAX,
            neutral: 1,
            negative: 0,
        });
        business.bot_stats = Some(BotStats {
            real: u64::MAX,
            suspicious: 0,
            bot: 0,
        });
        let all = vec![business.clone(), business];

        let stats = aggregate(&all);
        assert_eq!(stats.total_reviews, u64::MAX);
        assert_eq!(stats.sentiment.positive, u64::MAX);
        assert_eq!(stats.sentiment.neutral, 2);
        assert_eq!(stats.sentiment.total(), u64::MAX);
        assert_eq!(stats.bots.real, u64::MAX);
        assert_eq!(BotPercentages::from_stats(&stats).real, 100);
    }

    #[test]
    fn test_bot_percentages() {
        let stats = AggregatedStats {
            total_reviews: 20,
            bots: BotStats {
                real: 15,
                suspicious: 3,
                bot: 2,
            },
            ..AggregatedStats::default()
        };
        let pct = BotPercentages::from_stats(&stats);
        assert_eq!(pct.real, 75);
        assert_eq!(pct.suspicious, 15);
        assert_eq!(pct.bot, 10);
    }
}
