//! Dashboard state and view derivation.
//!
//! [`Dashboard`] owns the loaded business list, the active category filter
//! and the current selection. Renderers only ever see the derived
//! [`DashboardView`].

use crate::analysis::{
    aggregate, category_breakdown, category_counts, filter_by_category, AggregatedStats,
    BotPercentages, CategoryCounts, CategoryFilter, CategorySentiment, ReviewFilter,
};
use crate::client::{AnalysisService, ClientError, FallbackChain};
use crate::models::{AnalyzeRequest, Business, Category, Review};
use serde::Serialize;
use tracing::{debug, info};

/// What the statistics are currently computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    /// Nothing picked yet; behaves like the category scope.
    #[default]
    Unset,
    /// One business, by index into the full list.
    Business(usize),
    /// Every business visible under the active category filter.
    Category,
}

/// Errors from dashboard operations.
#[derive(thiserror::Error, Debug)]
pub enum DashboardError {
    #[error("No business at position {position} ({visible} visible)")]
    NoSuchBusiness { position: usize, visible: usize },
    #[error("Analysis request failed: {0}")]
    Analysis(#[from] ClientError),
}

/// Scope a view was computed for.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ViewScope {
    Business {
        name: String,
        category: Option<Category>,
        url: Option<String>,
    },
    Category {
        filter: CategoryFilter,
        businesses: usize,
    },
}

impl ViewScope {
    pub fn label(&self) -> String {
        match self {
            ViewScope::Business { name, category, .. } => match category {
                Some(c) if !c.category_name.is_empty() => {
                    format!("{} ({})", name, c.category_name)
                }
                _ => name.clone(),
            },
            ViewScope::Category {
                filter: CategoryFilter::All,
                businesses,
            } => format!("All categories ({} businesses)", businesses),
            ViewScope::Category {
                filter: CategoryFilter::Id(id),
                businesses,
            } => format!("Category {} ({} businesses)", id, businesses),
        }
    }
}

/// Entry in the visible business list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusinessEntry {
    /// Position within the visible list, as accepted by `select_business`.
    pub position: usize,
    pub name: String,
    pub icon: String,
    pub category_name: Option<String>,
    pub total_reviews: u64,
    pub analyzed_at: Option<String>,
}

/// Everything a renderer needs to draw the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub scope: ViewScope,
    pub stats: AggregatedStats,
    pub bot_percentages: BotPercentages,
    pub review_filter: ReviewFilter,
    pub category_counts: CategoryCounts,
    pub category_breakdown: Vec<CategorySentiment>,
}

impl DashboardView {
    /// Reviews passing the active review filter.
    pub fn visible_reviews(&self) -> impl Iterator<Item = &Review> {
        let filter = self.review_filter;
        self.stats.reviews.iter().filter(move |r| filter.matches(r))
    }
}

/// The dashboard controller.
#[derive(Debug, Default)]
pub struct Dashboard {
    businesses: Vec<Business>,
    category: CategoryFilter,
    selection: Selection,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_businesses(businesses: Vec<Business>) -> Self {
        Self {
            businesses,
            ..Self::default()
        }
    }

    pub fn businesses(&self) -> &[Business] {
        &self.businesses
    }

    pub fn category(&self) -> &CategoryFilter {
        &self.category
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Replace the business list from the first source that answers.
    ///
    /// Returns the name of that source, if any.
    pub async fn load(&mut self, chain: &FallbackChain) -> Option<String> {
        let outcome = chain.load().await;
        self.replace(outcome.businesses);
        outcome.source
    }

    /// Replace the business list wholesale and clear the selection.
    pub fn replace(&mut self, businesses: Vec<Business>) {
        debug!("Replacing {} businesses with {}", self.businesses.len(), businesses.len());
        self.businesses = businesses;
        self.selection = Selection::Unset;
    }

    /// Submit a URL for analysis and select the returned business.
    ///
    /// A record whose `url` matches an already loaded one replaces it in
    /// place instead of being pushed as a duplicate, following the service's
    /// own dedup of its history by url.
    pub async fn submit_analysis(
        &mut self,
        service: &dyn AnalysisService,
        request: &AnalyzeRequest,
    ) -> Result<&Business, DashboardError> {
        let business = service.analyze(request).await?;
        info!("Analysis complete for {}", business.name);

        let index = self.insert(business);
        self.selection = Selection::Business(index);
        Ok(&self.businesses[index])
    }

    /// Append a business, replacing one with the same non-empty URL.
    fn insert(&mut self, business: Business) -> usize {
        let existing = business.url.as_deref().filter(|u| !u.is_empty()).and_then(|url| {
            self.businesses
                .iter()
                .position(|b| b.url.as_deref() == Some(url))
        });

        match existing {
            Some(index) => {
                debug!("Replacing existing analysis for {}", business.name);
                self.businesses[index] = business;
                index
            }
            None => {
                self.businesses.push(business);
                self.businesses.len() - 1
            }
        }
    }

    /// Switch the category filter and show that category's aggregate.
    pub fn set_category(&mut self, filter: CategoryFilter) {
        debug!("Category filter set to {}", filter);
        self.category = filter;
        self.selection = Selection::Category;
    }

    /// Businesses visible under the active category filter.
    pub fn visible_businesses(&self) -> Vec<&Business> {
        filter_by_category(&self.businesses, &self.category)
    }

    /// Listing of the visible businesses with their positions.
    pub fn entries(&self) -> Vec<BusinessEntry> {
        self.visible_businesses()
            .into_iter()
            .enumerate()
            .map(|(position, b)| BusinessEntry {
                position,
                name: b.name.clone(),
                icon: b.icon().to_string(),
                category_name: b.category_name().map(String::from),
                total_reviews: b.total_reviews(),
                analyzed_at: b
                    .analyzed_at()
                    .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string()),
            })
            .collect()
    }

    /// Select the business at `position` within the visible list.
    pub fn select_business(&mut self, position: usize) -> Result<&Business, DashboardError> {
        let visible = self.visible_businesses();
        let target = visible
            .get(position)
            .copied()
            .ok_or(DashboardError::NoSuchBusiness {
                position,
                visible: visible.len(),
            })?;

        let index = self
            .businesses
            .iter()
            .position(|b| std::ptr::eq(b, target))
            .unwrap_or(position);

        self.selection = Selection::Business(index);
        Ok(&self.businesses[index])
    }

    /// The selected business, if a single business is selected.
    pub fn selected_business(&self) -> Option<&Business> {
        match self.selection {
            Selection::Business(index) => self.businesses.get(index),
            _ => None,
        }
    }

    /// Derive the view for the current selection.
    pub fn view(&self, review_filter: ReviewFilter) -> DashboardView {
        let (scope, stats) = match self.selected_business() {
            Some(business) => (
                ViewScope::Business {
                    name: business.name.clone(),
                    category: business.category.clone(),
                    url: business.url.clone(),
                },
                aggregate(std::iter::once(business)),
            ),
            None => {
                let visible = self.visible_businesses();
                (
                    ViewScope::Category {
                        filter: self.category.clone(),
                        businesses: visible.len(),
                    },
                    aggregate(visible),
                )
            }
        };

        DashboardView {
            bot_percentages: BotPercentages::from_stats(&stats),
            scope,
            stats,
            review_filter,
            category_counts: category_counts(&self.businesses),
            category_breakdown: category_breakdown(&self.businesses),
        }
    }
}
