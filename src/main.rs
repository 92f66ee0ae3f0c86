//! Cross-venue prediction market arbitrage scanner entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crossmarket_arb::api::handlers::ViewResponse;
use crossmarket_arb::api::{create_router, AppState};
use crossmarket_arb::config::Config;
use crossmarket_arb::market::sim::{catalog, SimConfig, SimulatedSource};
use crossmarket_arb::market::types::CategoryFilter;
use crossmarket_arb::metrics;
use crossmarket_arb::scheduler::RefreshScheduler;
use crossmarket_arb::store::OpportunityStore;
use crossmarket_arb::utils::shutdown_signal;

/// Cross-venue crypto prediction market arbitrage scanner.
#[derive(Parser, Debug)]
#[command(name = "crossmarket-arb")]
#[command(about = "Scans Polymarket and Opinion Labs quotes for complete-set arbitrage")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP server port (overrides PORT).
    #[arg(short, long)]
    port: Option<u16>,

    /// Start with auto-refresh on or off (overrides AUTO_REFRESH).
    #[arg(long)]
    auto_refresh: Option<bool>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the scanner with the HTTP API (default).
    Run {
        /// HTTP server port (overrides PORT).
        #[arg(short, long)]
        port: Option<u16>,

        /// Start with auto-refresh on or off (overrides AUTO_REFRESH).
        #[arg(long)]
        auto_refresh: Option<bool>,
    },

    /// Run a single refresh and print the result set.
    ScanOnce {
        /// Restrict the output to one category.
        #[arg(short, long)]
        category: Option<String>,

        /// Print the result set as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Check configuration validity.
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("crossmarket_arb=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    // Initialize metrics; the recorder must be installed before the
    // descriptions are registered.
    let prometheus = PrometheusBuilder::new().install_recorder()?;
    metrics::init_metrics();

    // Handle subcommands
    match args.command {
        Some(Command::CheckConfig) => cmd_check_config().await,
        Some(Command::ScanOnce { category, json }) => cmd_scan_once(category, json).await,
        Some(Command::Run { port, auto_refresh }) => cmd_run(port, auto_refresh, prometheus).await,
        None => cmd_run(args.port, args.auto_refresh, prometheus).await,
    }
}

/// Check configuration validity.
async fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("CROSS-VENUE ARB SCANNER - CONFIGURATION CHECK");
    println!("======================================================================");

    // Load configuration
    print!("Loading configuration... ");
    let config = match Config::load() {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    // Validate configuration
    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    // Show configuration summary
    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Refresh Interval: {}s", config.refresh_interval_secs);
    println!(
        "  Auto-Refresh: {}",
        if config.auto_refresh { "Enabled" } else { "Disabled" }
    );
    println!("  Fetch Timeout: {}ms", config.fetch_timeout_ms);
    println!("  Profit Threshold: {}%", config.profit_threshold);
    println!("  Feed Latency: {}ms", config.sim_latency_ms);
    println!("  HTTP Port: {}", config.port);
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Run a single refresh and print the result set.
async fn cmd_scan_once(category: Option<String>, json: bool) -> anyhow::Result<()> {
    let config = Config::load_checked()?;

    let store = Arc::new(OpportunityStore::new());
    let source = Arc::new(SimulatedSource::with_config(SimConfig {
        latency_ms: config.sim_latency_ms,
    }));
    let scheduler = RefreshScheduler::new(source, store.clone(), &config);

    let filter = match category.as_deref() {
        Some(raw) => raw
            .parse::<CategoryFilter>()
            .map_err(|_| anyhow::anyhow!("unknown category: {raw}"))?,
        None => CategoryFilter::All,
    };
    store.set_filter(filter).await;

    let report = scheduler.refresh_now().await?;
    let view = store.view().await;

    if json {
        let response = ViewResponse::from_view(filter, &view);
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    println!("======================================================================");
    println!("CROSS-VENUE ARBITRAGE SCAN - {}", filter.label());
    println!("======================================================================");
    println!(
        "{:<4} {:<32} {:<10} {:>8} {:>8} {:>8}",
        "ID", "EVENT", "CATEGORY", "POLY", "OPINION", "PROFIT%"
    );
    println!("----------------------------------------------------------------------");
    for item in &view.items {
        println!(
            "{:<4} {:<32} {:<10} {:>8} {:>8} {:>8}",
            item.event_id,
            item.event_name,
            item.category,
            item.polymarket_total.round_dp(4),
            item.opinion_total.round_dp(4),
            item.max_profit.round_dp(2),
        );
        println!("     {}", item.direction.strategy());
    }
    if view.items.is_empty() {
        println!("No opportunities above the threshold this scan.");
    }
    println!("----------------------------------------------------------------------");
    println!(
        "Rows fetched: {}   Degenerate: {}",
        report.rows, report.degenerate_quotes
    );
    println!(
        "Opportunities: {}   Average profit: {}%   Total: {}%",
        view.count,
        view.average_profit.round_dp(2),
        view.total_profit.round_dp(2)
    );
    println!("======================================================================");

    Ok(())
}

/// Run the scanner with the HTTP API.
async fn cmd_run(
    port_override: Option<u16>,
    auto_refresh_override: Option<bool>,
    prometheus: PrometheusHandle,
) -> anyhow::Result<()> {
    // Load configuration
    info!("Loading configuration...");
    let mut config = Config::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    // Override with CLI args if provided
    if let Some(port) = port_override {
        config.port = port;
    }
    if let Some(auto_refresh) = auto_refresh_override {
        config.auto_refresh = auto_refresh;
    }

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
    }

    info!("Configuration loaded successfully");
    info!("Refresh interval: {}s", config.refresh_interval_secs);
    info!("Profit threshold: {}%", config.profit_threshold);
    info!(
        "Auto-refresh: {}",
        if config.auto_refresh { "Enabled" } else { "Disabled" }
    );

    // Wire the pipeline
    let store = Arc::new(OpportunityStore::new());
    let source = Arc::new(SimulatedSource::with_config(SimConfig {
        latency_ms: config.sim_latency_ms,
    }));
    let scheduler = RefreshScheduler::new(source, store.clone(), &config);

    let app_state = AppState::new(scheduler.clone(), store).with_prometheus(prometheus);
    let router = create_router(app_state);

    // Start HTTP server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);

    // Kick the first refresh; the timer arms if auto-refresh is on
    scheduler.start();

    info!("========================================");
    info!("CROSS-VENUE ARBITRAGE SCANNER STARTED");
    info!("========================================");
    info!("Venues: Polymarket vs Opinion Labs");
    info!("Events tracked: {}", catalog().len());
    info!("Swagger UI: http://{}/swagger-ui", addr);
    info!("========================================");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler.shutdown();
    info!("Scanner stopped");

    Ok(())
}
