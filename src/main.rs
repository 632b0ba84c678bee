//! ReviewLens - terminal dashboard for review sentiment analyses
//!
//! A CLI client for the review analysis service: it loads analyzed
//! businesses, aggregates them by category, renders sentiment and
//! bot-detection statistics, and submits new URLs for analysis.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (invalid arguments, failed analysis, unreachable service, etc.)

mod analysis;
mod cli;
mod client;
mod config;
mod dashboard;
mod models;
mod report;

use analysis::CategoryFilter;
use anyhow::{Context, Result};
use cli::{AnalyzeArgs, Args, Command, ListArgs, OutputFormat, ShowArgs};
use client::{ApiClient, ApiClientConfig, FallbackChain};
use config::{Config, RenderSettings, CONFIG_FILE};
use dashboard::{Dashboard, DashboardView};
use indicatif::{ProgressBar, ProgressStyle};
use models::{AnalyzeRequest, CategoryInfo};
use std::time::Duration;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle init-config early (no logging needed)
    if let Command::InitConfig = args.command {
        return handle_init_config();
    }

    init_logging(&args);

    info!("ReviewLens v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(args).await {
        error!("Command failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle init-config: generate a default .reviewlens.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE);
    println!("   Edit it to point at your analysis service and adjust display defaults.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// `RUST_LOG` takes precedence over the verbosity flags when set.
fn init_logging(args: &Args) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level().to_string()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

async fn run(args: Args) -> Result<()> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let client = ApiClient::new(ApiClientConfig::from(&config.api))
        .context("Failed to create HTTP client")?;

    match args.command {
        Command::Show(ref show) => run_show(&config, &client, show, args.quiet).await,
        Command::List(ref list) => run_list(&config, &client, list, args.quiet).await,
        Command::Analyze(ref analyze) => run_analyze(&config, &client, analyze, args.quiet).await,
        Command::Categories => run_categories(&client).await,
        Command::Health => run_health(&client).await,
        Command::InitConfig => handle_init_config(),
    }
}

/// Load the dashboard, focus the requested scope and render it.
async fn run_show(config: &Config, client: &ApiClient, args: &ShowArgs, quiet: bool) -> Result<()> {
    let settings = config.render_settings(&args.render);
    let mut dashboard = load_dashboard(config, client, quiet).await;

    dashboard.set_category(args.category.clone().unwrap_or_default());
    if let Some(position) = args.business {
        dashboard.select_business(position)?;
    }

    let view = dashboard.view(settings.review_filter);
    emit(&render(&view, &settings)?, &settings)
}

/// Print the visible business listing with category counts.
async fn run_list(config: &Config, client: &ApiClient, args: &ListArgs, quiet: bool) -> Result<()> {
    let filter = args.category.clone().unwrap_or_default();

    let mut dashboard = match (&filter, args.remote_filter) {
        (CategoryFilter::Id(id), true) => {
            let spinner = spinner(quiet, &format!("Loading {} history...", id));
            let result = client.history_by_category(id).await;
            finish(spinner);
            Dashboard::with_businesses(
                result.with_context(|| format!("Failed to load history for category {}", id))?,
            )
        }
        _ => load_dashboard(config, client, quiet).await,
    };
    dashboard.set_category(filter);

    if args.json {
        println!("{}", report::generate_json_report(&dashboard.entries())?);
        return Ok(());
    }

    let counts = dashboard.view(config.display.review_filter).category_counts;
    print!(
        "{}",
        report::terminal::render_business_list(&dashboard.entries(), &counts, dashboard.category())
    );
    Ok(())
}

/// Submit a URL, add the result to the loaded history and render it.
async fn run_analyze(
    config: &Config,
    client: &ApiClient,
    args: &AnalyzeArgs,
    quiet: bool,
) -> Result<()> {
    let settings = config.render_settings(&args.render);
    let mut dashboard = load_dashboard(config, client, quiet).await;
    let request = AnalyzeRequest::new(&args.url, args.name.as_deref());

    let spinner = spinner(quiet, "Analyzing reviews (this can take a few minutes)...");
    let result = dashboard.submit_analysis(client, &request).await;
    finish(spinner);

    let business = result.context("Could not analyze the URL. Check that the analysis service is running")?;
    if !quiet {
        eprintln!(
            "✅ {} analyzed ({})",
            business.name,
            business.category_name().unwrap_or("uncategorized")
        );
    }

    let view = dashboard.view(settings.review_filter);
    emit(&render(&view, &settings)?, &settings)
}

/// Print the categories known to the service, or the built-in table.
async fn run_categories(client: &ApiClient) -> Result<()> {
    let categories = match client.categories().await {
        Ok(categories) => categories,
        Err(e) => {
            warn!("Could not fetch categories: {}", e);
            CategoryInfo::builtin()
        }
    };

    print!("{}", report::terminal::render_categories(&categories));
    Ok(())
}

async fn run_health(client: &ApiClient) -> Result<()> {
    let health = client
        .health()
        .await
        .with_context(|| format!("Analysis service at {} is not reachable", client.base_url()))?;

    println!(
        "✅ {} is {} (version {})",
        client.base_url(),
        health.status,
        health.version.as_deref().unwrap_or("unknown")
    );
    Ok(())
}

/// Load history through the fallback chain.
async fn load_dashboard(config: &Config, client: &ApiClient, quiet: bool) -> Dashboard {
    let chain = FallbackChain::for_client(client, config.api.fallback_to_mock);
    let mut dashboard = Dashboard::new();

    let spinner = spinner(quiet, "Loading analysis history...");
    let source = dashboard.load(&chain).await;
    finish(spinner);

    match source {
        Some(source) => debug!("History loaded from {}", source),
        None => warn!("Analysis service unavailable; showing an empty dashboard"),
    }

    dashboard
}

fn render(view: &DashboardView, settings: &RenderSettings) -> Result<String> {
    Ok(match settings.format {
        OutputFormat::Terminal => report::terminal::render_dashboard(view, settings.max_reviews),
        OutputFormat::Markdown => report::generate_markdown_report(view, settings.max_reviews),
        OutputFormat::Json => report::generate_json_report(view)?,
    })
}

fn emit(output: &str, settings: &RenderSettings) -> Result<()> {
    match settings.output {
        Some(ref path) => {
            std::fs::write(path, output)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            println!("✅ Report saved to: {}", path.display());
        }
        None => print!("{}", output),
    }
    Ok(())
}

fn spinner(quiet: bool, message: &str) -> Option<ProgressBar> {
    if quiet {
        return None;
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}

fn finish(spinner: Option<ProgressBar>) {
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
