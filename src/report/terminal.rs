//! Colored terminal rendering of the dashboard and listings.

use crate::analysis::{
    author_initials, percentage, rating_stars, score_bar, BotScoreLevel, CategoryCounts,
    CategoryFilter, CategorySentiment,
};
use crate::dashboard::{BusinessEntry, DashboardView};
use crate::models::{BotClassification, CategoryInfo, Review, Sentiment};
use colored::{ColoredString, Colorize};
use std::fmt::Write;

const BAR_WIDTH: usize = 30;
const SCORE_BAR_WIDTH: usize = 10;

// ── formatting helpers ────────────────────────────────────────────────────────

fn heading(title: &str) -> String {
    format!("\n{}\n{}\n", title.bold(), "─".repeat(60))
}

fn sentiment_colored(sentiment: Sentiment, text: &str) -> ColoredString {
    match sentiment {
        Sentiment::Positive => text.green(),
        Sentiment::Neutral => text.yellow(),
        Sentiment::Negative => text.red(),
        Sentiment::Unknown => text.normal(),
    }
}

fn score_colored(score: u8, text: &str) -> ColoredString {
    match BotScoreLevel::from_score(score) {
        BotScoreLevel::Low => text.green(),
        BotScoreLevel::Medium => text.yellow(),
        BotScoreLevel::High => text.red(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

// ── dashboard ─────────────────────────────────────────────────────────────────

pub fn render_dashboard(view: &DashboardView, max_reviews: usize) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{} {}", "📊".bold(), view.scope.label().bold().cyan());
    out.push_str(&render_stats(view));
    out.push_str(&render_sentiment_chart(view));
    out.push_str(&render_comparison_chart(&view.category_breakdown));
    out.push_str(&render_reviews(view, max_reviews));

    out
}

fn render_stats(view: &DashboardView) -> String {
    let stats = &view.stats;
    let pct = &view.bot_percentages;
    let mut out = heading("Overview");

    let _ = writeln!(out, "  Total reviews   {}", stats.total_reviews.to_string().bold());
    let _ = writeln!(
        out,
        "  {} {}   {} {}   {} {}",
        "Positive".green(),
        stats.sentiment.positive,
        "Neutral".yellow(),
        stats.sentiment.neutral,
        "Negative".red(),
        stats.sentiment.negative,
    );
    let _ = writeln!(
        out,
        "  {} {} ({}%)   {} {} ({}%)   {} {} ({}%)",
        "Real".green(),
        stats.bots.real,
        pct.real,
        "Suspicious".yellow(),
        stats.bots.suspicious,
        pct.suspicious,
        "Bot".red(),
        stats.bots.bot,
        pct.bot,
    );

    out
}

fn render_sentiment_chart(view: &DashboardView) -> String {
    let sentiment = &view.stats.sentiment;
    let total = sentiment.total();
    let mut out = heading("Sentiment");

    for (label, count, kind) in [
        ("Positive", sentiment.positive, Sentiment::Positive),
        ("Neutral", sentiment.neutral, Sentiment::Neutral),
        ("Negative", sentiment.negative, Sentiment::Negative),
    ] {
        let share = percentage(count, total);
        let _ = writeln!(
            out,
            "  {:<9} {} {:>4}  {:>3}%",
            label,
            sentiment_colored(kind, &score_bar(share, BAR_WIDTH)),
            count,
            share,
        );
    }

    out
}

fn render_comparison_chart(groups: &[CategorySentiment]) -> String {
    let mut out = heading("By category");

    if groups.is_empty() {
        let _ = writeln!(out, "  {}", "No businesses loaded.".yellow());
        return out;
    }

    let widest = groups
        .iter()
        .map(|g| g.category_name.chars().count())
        .max()
        .unwrap_or(0)
        .min(20);

    for group in groups {
        let s = &group.sentiment;
        let _ = writeln!(
            out,
            "  {:<w$}  {} {:>4}  {} {:>4}  {} {:>4}",
            truncate(&group.category_name, 20),
            "+".green(),
            s.positive,
            "~".yellow(),
            s.neutral,
            "-".red(),
            s.negative,
            w = widest,
        );
    }

    out
}

fn render_reviews(view: &DashboardView, max_reviews: usize) -> String {
    let mut out = heading(&format!("Reviews (filter: {})", view.review_filter));
    let reviews: Vec<&Review> = view.visible_reviews().collect();

    if reviews.is_empty() {
        let _ = writeln!(out, "  {}", "No reviews available.".yellow());
        return out;
    }

    for review in reviews.iter().take(max_reviews) {
        out.push_str(&render_review_card(review));
    }

    if reviews.len() > max_reviews {
        let _ = writeln!(
            out,
            "  {}",
            format!("… {} more reviews not shown", reviews.len() - max_reviews).dimmed()
        );
    }

    out
}

pub fn render_review_card(review: &Review) -> String {
    let mut out = String::new();
    let score = review.bot_score();

    let mut badges = vec![sentiment_colored(
        review.sentiment,
        &format!("{} {}", review.sentiment.emoji(), review.sentiment),
    )
    .to_string()];
    match review.bot_classification {
        BotClassification::Bot => badges.push("🤖 Bot".red().bold().to_string()),
        BotClassification::Suspicious => badges.push("⚠️ Suspicious".yellow().to_string()),
        _ => {}
    }

    let author = if review.author.is_empty() {
        "Anonymous"
    } else {
        review.author.as_str()
    };

    let _ = writeln!(
        out,
        "\n  [{}] {}  {}",
        author_initials(&review.author).bold(),
        author.bold(),
        badges.join(" ")
    );
    if !review.text.is_empty() {
        let _ = writeln!(out, "  \"{}\"", review.text.italic());
    }
    let _ = writeln!(
        out,
        "  {}  Bot score: {} {}",
        rating_stars(review.rating()).yellow(),
        score_colored(score, &format!("{}%", score)),
        score_colored(score, &score_bar(score as u64, SCORE_BAR_WIDTH)),
    );

    if !review.bot_indicators.is_empty() {
        let tags: Vec<String> = review
            .bot_indicators
            .iter()
            .map(|i| format!("[{}]", i.label()))
            .collect();
        let _ = writeln!(out, "  {}", tags.join(" ").dimmed());
    }

    out
}

// ── listings ──────────────────────────────────────────────────────────────────

pub fn render_business_list(
    entries: &[BusinessEntry],
    counts: &CategoryCounts,
    filter: &CategoryFilter,
) -> String {
    let mut out = String::new();

    let mut tabs = vec![format!("All {}", counts.total)];
    tabs.extend(
        counts
            .by_category
            .iter()
            .map(|c| format!("{} {} {}", c.icon, c.category_name, c.count)),
    );
    let _ = writeln!(out, "{}", tabs.join("  │  ").dimmed());
    let _ = writeln!(out, "{} {}", "Category:".bold(), filter);

    if entries.is_empty() {
        let _ = writeln!(out, "{}", "No businesses found.".yellow());
        return out;
    }

    let _ = writeln!(
        out,
        "\n{:>4}  {:<40}  {:<14}  {:>7}  {:<16}",
        "#".bold(),
        "BUSINESS".bold(),
        "CATEGORY".bold(),
        "REVIEWS".bold(),
        "ANALYZED".bold(),
    );
    let _ = writeln!(out, "{}", "─".repeat(89));

    for entry in entries {
        let _ = writeln!(
            out,
            "{:>4}  {:<40}  {:<14}  {:>7}  {:<16}",
            entry.position,
            truncate(&format!("{} {}", entry.icon, entry.name), 40),
            truncate(entry.category_name.as_deref().unwrap_or("-"), 14),
            entry.total_reviews,
            entry.analyzed_at.as_deref().unwrap_or("-"),
        );
    }

    out
}

pub fn render_categories(categories: &[CategoryInfo]) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{:<14}  {}", "ID".bold(), "NAME".bold());
    for category in categories {
        let _ = writeln!(
            out,
            "{:<14}  {} {}",
            category.id.cyan(),
            category.icon,
            category.name
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::ReviewFilter;
    use crate::dashboard::Dashboard;
    use crate::models::{BotIndicator, Business, SentimentSummary};

    fn plain() {
        colored::control::set_override(false);
    }

    fn sample_view(filter: ReviewFilter) -> DashboardView {
        let business = Business {
            name: "Pollería El Rey".to_string(),
            total_reviews: Some(2),
            sentiment_summary: Some(SentimentSummary {
                positive: 1,
                neutral: 0,
                negative: 1,
            }),
            reviews: Some(vec![
                Review {
                    author: "Ana López".to_string(),
                    text: "Muy buena atención".to_string(),
                    rating: Some(5.0),
                    sentiment: Sentiment::Positive,
                    bot_score: Some(12),
                    bot_classification: BotClassification::Real,
                    ..Review::default()
                },
                Review {
                    author: "ReviewBot".to_string(),
                    text: "Malo".to_string(),
                    rating: Some(1.0),
                    sentiment: Sentiment::Negative,
                    bot_score: Some(85),
                    bot_classification: BotClassification::Bot,
                    bot_indicators: vec![BotIndicator::ShortText, BotIndicator::ExtremeRating],
                    ..Review::default()
                },
            ]),
            ..Business::default()
        };
        Dashboard::with_businesses(vec![business]).view(filter)
    }

    #[test]
    fn test_render_dashboard_sections() {
        plain();
        let output = render_dashboard(&sample_view(ReviewFilter::All), 20);

        assert!(output.contains("All categories (1 businesses)"));
        assert!(output.contains("Overview"));
        assert!(output.contains("Sentiment"));
        assert!(output.contains("By category"));
        assert!(output.contains("Otros"));
        assert!(output.contains("Ana López"));
        assert!(output.contains("★★★★★"));
        assert!(output.contains("Short text"));
        assert!(output.contains("Extreme rating"));
    }

    #[test]
    fn test_render_reviews_respects_filter_and_limit() {
        plain();
        let output = render_dashboard(&sample_view(ReviewFilter::Bot), 20);
        assert!(output.contains("ReviewBot"));
        assert!(!output.contains("Ana López"));

        let output = render_dashboard(&sample_view(ReviewFilter::All), 1);
        assert!(output.contains("1 more reviews not shown"));
    }

    #[test]
    fn test_render_review_card_badges() {
        plain();
        let view = sample_view(ReviewFilter::All);
        let card = render_review_card(&view.stats.reviews[1]);
        assert!(card.contains("[RE]"));
        assert!(card.contains("🤖 Bot"));
        assert!(card.contains("85%"));
    }

    #[test]
    fn test_render_empty_reviews() {
        plain();
        let view = Dashboard::new().view(ReviewFilter::All);
        let output = render_dashboard(&view, 10);
        assert!(output.contains("No reviews available."));
        assert!(output.contains("No businesses loaded."));
    }

    #[test]
    fn test_render_business_list() {
        plain();
        let dashboard = Dashboard::with_businesses(vec![Business {
            name: "Hostal Miraflores".to_string(),
            total_reviews: Some(31),
            ..Business::default()
        }]);
        let view = dashboard.view(ReviewFilter::All);
        let output =
            render_business_list(&dashboard.entries(), &view.category_counts, dashboard.category());

        assert!(output.contains("All 1"));
        assert!(output.contains("Hostal Miraflores"));
        assert!(output.contains("31"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("Gastronomía peruana", 8), "Gastron…");
    }
}
