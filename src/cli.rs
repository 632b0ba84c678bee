//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation.

use crate::analysis::{CategoryFilter, ReviewFilter};
use clap::{Args as ClapArgs, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// ReviewLens - terminal dashboard for review sentiment analyses
///
/// Browse analyzed businesses, aggregate them by category, and submit new
/// Google Maps URLs to the analysis service.
///
/// Examples:
///   reviewlens show
///   reviewlens show --category salud --filter bot
///   reviewlens list --category retail
///   reviewlens show --category retail --business 0 --format markdown -o report.md
///   reviewlens analyze "https://maps.google.com/..." --name "Clínica Sur"
///   reviewlens init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Base URL of the analysis service
    ///
    /// Overrides `api.base_url` from .reviewlens.toml.
    #[arg(long, global = true, value_name = "URL", env = "REVIEWLENS_API_URL")]
    pub api_url: Option<String>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .reviewlens.toml in the current directory
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Don't fall back to /mock-analysis when /history is unavailable
    #[arg(long, global = true)]
    pub no_fallback: bool,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Show aggregated statistics and review cards
    Show(ShowArgs),

    /// List analyzed businesses with their positions
    List(ListArgs),

    /// Submit a URL for analysis and show the result
    Analyze(AnalyzeArgs),

    /// List the categories known to the service
    Categories,

    /// Check that the analysis service is reachable
    Health,

    /// Generate a default .reviewlens.toml configuration file
    InitConfig,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ShowArgs {
    /// Category id to aggregate over (salud, gastronomia, hospedaje, retail, educacion or all)
    #[arg(long, value_name = "ID")]
    pub category: Option<CategoryFilter>,

    /// Position of a single business within the category listing
    #[arg(short, long, value_name = "POS")]
    pub business: Option<usize>,

    #[command(flatten)]
    pub render: RenderArgs,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ListArgs {
    /// Only list businesses in this category
    #[arg(long, value_name = "ID")]
    pub category: Option<CategoryFilter>,

    /// Ask the service to filter by category instead of filtering locally
    #[arg(long, requires = "category")]
    pub remote_filter: bool,

    /// Print the listing as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Google Maps URL of the business
    #[arg(value_name = "URL")]
    pub url: String,

    /// Business name, if the URL doesn't carry one
    #[arg(short, long, value_name = "NAME")]
    pub name: Option<String>,

    #[command(flatten)]
    pub render: RenderArgs,
}

/// Rendering options shared by commands that draw the dashboard.
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct RenderArgs {
    /// Review filter (all, positive, neutral, negative, bot)
    #[arg(long, value_name = "FILTER")]
    pub filter: Option<ReviewFilter>,

    /// Output format (terminal, markdown, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Write the rendered output to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Maximum number of review cards to render
    #[arg(long, value_name = "COUNT")]
    pub max_reviews: Option<usize>,
}

/// Output format for rendered dashboards.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Colored terminal output (default)
    #[default]
    Terminal,
    /// Markdown format
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(ref url) = self.api_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("API URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        let render = match &self.command {
            Command::Show(show) => Some(&show.render),
            Command::Analyze(analyze) => {
                if analyze.url.trim().is_empty() {
                    return Err("Please provide a Google Maps URL to analyze".to_string());
                }
                Some(&analyze.render)
            }
            _ => None,
        };

        if let Some(render) = render {
            if render.max_reviews == Some(0) {
                return Err("Max reviews must be at least 1".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
