//! Markdown dashboard report generation.
//!
//! This module renders a [`DashboardView`] as a self-contained Markdown
//! document: overview tables, sentiment and category breakdowns, and one
//! block per review.

use crate::analysis::{author_initials, percentage, rating_stars, BotScoreLevel, CategorySentiment};
use crate::dashboard::DashboardView;
use crate::models::{BotClassification, Review};
use chrono::Utc;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(view: &DashboardView, max_reviews: usize) -> String {
    let mut output = String::new();

    output.push_str("# ReviewLens Report\n\n");
    output.push_str(&generate_metadata_section(view));
    output.push_str(&generate_overview_section(view));
    output.push_str(&generate_sentiment_section(view));
    output.push_str(&generate_category_section(&view.category_breakdown));
    output.push_str(&generate_reviews_section(view, max_reviews));
    output.push_str(&generate_footer());

    output
}

fn generate_metadata_section(view: &DashboardView) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Scope:** {}\n", view.scope.label()));
    section.push_str(&format!("- **Review Filter:** `{}`\n", view.review_filter));
    section.push_str(&format!(
        "- **Businesses Loaded:** {}\n",
        view.category_counts.total
    ));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push('\n');

    section
}

fn generate_overview_section(view: &DashboardView) -> String {
    let stats = &view.stats;
    let pct = &view.bot_percentages;
    let mut section = String::new();

    section.push_str("## Overview\n\n");
    section.push_str("| Total Reviews | 😊 Positive | 😐 Neutral | 😞 Negative |\n");
    section.push_str("|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| **{}** | {} | {} | {} |\n\n",
        stats.total_reviews,
        stats.sentiment.positive,
        stats.sentiment.neutral,
        stats.sentiment.negative
    ));

    section.push_str("### Bot Detection\n\n");
    section.push_str("| ✅ Real | ⚠️ Suspicious | 🤖 Bot |\n");
    section.push_str("|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} ({}%) | {} ({}%) | {} ({}%) |\n\n",
        stats.bots.real,
        pct.real,
        stats.bots.suspicious,
        pct.suspicious,
        stats.bots.bot,
        pct.bot
    ));

    section
}

fn generate_sentiment_section(view: &DashboardView) -> String {
    let sentiment = &view.stats.sentiment;
    let total = sentiment.total();
    let mut section = String::new();

    section.push_str("## Sentiment Distribution\n\n");
    section.push_str("| Sentiment | Reviews | Share |\n");
    section.push_str("|:---|:---:|:---:|\n");
    for (label, count) in [
        ("Positive", sentiment.positive),
        ("Neutral", sentiment.neutral),
        ("Negative", sentiment.negative),
    ] {
        section.push_str(&format!(
            "| {} | {} | {}% |\n",
            label,
            count,
            percentage(count, total)
        ));
    }
    section.push('\n');

    section
}

fn generate_category_section(groups: &[CategorySentiment]) -> String {
    if groups.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("## Sentiment by Category\n\n");
    section.push_str("| Category | Positive | Neutral | Negative |\n");
    section.push_str("|:---|:---:|:---:|:---:|\n");

    for group in groups {
        section.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            group.category_name,
            group.sentiment.positive,
            group.sentiment.neutral,
            group.sentiment.negative
        ));
    }
    section.push('\n');

    section
}

fn generate_reviews_section(view: &DashboardView, max_reviews: usize) -> String {
    let mut section = String::new();
    let reviews: Vec<&Review> = view.visible_reviews().collect();

    section.push_str("## Reviews\n\n");

    if reviews.is_empty() {
        section.push_str("No reviews available.\n\n");
        return section;
    }

    for review in reviews.iter().take(max_reviews) {
        section.push_str(&generate_review_block(review));
    }

    if reviews.len() > max_reviews {
        section.push_str(&format!(
            "*{} more reviews not shown.*\n\n",
            reviews.len() - max_reviews
        ));
    }

    section
}

/// Generate a single review block.
fn generate_review_block(review: &Review) -> String {
    let mut block = String::new();
    let score = review.bot_score();

    let badge = match review.bot_classification {
        BotClassification::Bot => " 🤖 **BOT**",
        BotClassification::Suspicious => " ⚠️ **SUSPICIOUS**",
        _ => "",
    };

    block.push_str(&format!(
        "#### {} {} - {} {}{}\n\n",
        author_initials(&review.author),
        if review.author.is_empty() {
            "Anonymous"
        } else {
            review.author.as_str()
        },
        review.sentiment.emoji(),
        review.sentiment,
        badge
    ));

    if !review.text.is_empty() {
        block.push_str(&format!("> {}\n\n", review.text));
    }

    let level = match BotScoreLevel::from_score(score) {
        BotScoreLevel::Low => "🟢",
        BotScoreLevel::Medium => "🟡",
        BotScoreLevel::High => "🔴",
    };
    block.push_str(&format!(
        "**Rating:** {} | **Bot Score:** {} {}%\n\n",
        rating_stars(review.rating()),
        level,
        score
    ));

    if !review.bot_indicators.is_empty() {
        let tags: Vec<String> = review
            .bot_indicators
            .iter()
            .map(|i| format!("`{}`", i.label()))
            .collect();
        block.push_str(&format!("**Indicators:** {}\n\n", tags.join(" ")));
    }

    block.push_str("---\n\n");

    block
}

fn generate_footer() -> String {
    "*Report generated by ReviewLens*\n".to_string()
}
