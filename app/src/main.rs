use anyhow::{Context, Result};
use api_client::ApiClient;
use app_config::Settings;
use backtester::{rank_by_edge, BacktestSummary, CrossoverBacktester};
use clap::{Parser, Subcommand};
use core_types::Symbol;
use datastore::{BarRow, Store};
use rayon::prelude::*;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::sleep;
use tracing_subscriber::EnvFilter;

mod report;

use crate::report::{
    print_backtest_summary, print_ranking, print_return_stats, print_returns_comparison,
};

// --- Command-Line Interface Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = "A stock analysis and backtesting toolkit.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Downloads the configured historical span for every instrument.
    Fetch,

    /// Prints the shape and a preview of a stored history.
    Explore {
        /// A single symbol to explore; defaults to every configured instrument.
        #[arg(short, long)]
        symbol: Option<String>,
    },

    /// Per-instrument daily-return statistics plus cross-instrument rankings.
    Returns,

    /// Renders the daily-return correlation heatmap and prints the extremes.
    Correlation,

    /// Renders the multi-instrument close-price comparison chart.
    PriceChart,

    /// Runs the moving-average crossover backtest and renders strategy charts.
    Backtest {
        /// A single symbol to backtest; defaults to every configured instrument.
        #[arg(short, long)]
        symbol: Option<String>,
    },
}

// --- Main Application Entry Point ---

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from a .env file, if it exists.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Parse command-line arguments.
    let cli = Cli::parse();

    tracing::info!("Starting Meridian application");

    let settings = app_config::load_settings()?;

    match cli.command {
        Commands::Fetch => handle_fetch(&settings).await?,
        Commands::Explore { symbol } => handle_explore(&settings, symbol)?,
        Commands::Returns => handle_returns(&settings)?,
        Commands::Correlation => handle_correlation(&settings)?,
        Commands::PriceChart => handle_price_chart(&settings)?,
        Commands::Backtest { symbol } => handle_backtest(&settings, symbol)?,
    }

    tracing::info!("Meridian application has finished successfully.");

    Ok(())
}

/// Resolves the instruments a command operates on: an explicit symbol, or
/// the whole configured list in its configured order.
fn resolve_instruments(settings: &Settings, symbol: Option<String>) -> Vec<Symbol> {
    match symbol {
        Some(s) => vec![Symbol(s)],
        None => settings.instruments.iter().cloned().map(Symbol).collect(),
    }
}

fn store(settings: &Settings) -> Store {
    Store::new(&settings.data.data_dir)
}

fn charts_dir(settings: &Settings) -> Result<PathBuf> {
    let dir = PathBuf::from(&settings.data.charts_dir);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create charts directory {}", dir.display()))?;
    Ok(dir)
}

// --- "Fetch" Subcommand Logic ---

/// Downloads each configured instrument in turn. One failed download is
/// logged and skipped so the rest of the list still completes.
async fn handle_fetch(settings: &Settings) -> Result<()> {
    let api_client = ApiClient::new(&settings.provider)?;
    let store = store(settings);
    let instruments = resolve_instruments(settings, None);

    tracing::info!(
        count = instruments.len(),
        range = %settings.provider.range,
        "Starting fetch for configured instruments."
    );

    let mut saved = 0usize;
    for symbol in &instruments {
        match api_client.get_daily_history(symbol).await {
            Ok(bars) => {
                let rows: Vec<BarRow> = bars
                    .iter()
                    .map(|b| BarRow {
                        date: b.date,
                        open: b.open,
                        high: b.high,
                        low: b.low,
                        close: b.close,
                        volume: b.volume,
                    })
                    .collect();
                store.save_bars(symbol, &rows)?;
                tracing::info!(symbol = %symbol.0, days = rows.len(), "Saved history.");
                saved += 1;
            }
            Err(e) => {
                tracing::error!(symbol = %symbol.0, error = %e, "Fetch failed; skipping instrument.");
            }
        }
        sleep(Duration::from_millis(300)).await;
    }

    tracing::info!(saved, total = instruments.len(), "Fetch complete.");
    Ok(())
}

// --- "Explore" Subcommand Logic ---

fn handle_explore(settings: &Settings, symbol: Option<String>) -> Result<()> {
    let store = store(settings);
    for symbol in resolve_instruments(settings, symbol) {
        let bars = store
            .load_bars(&symbol)
            .with_context(|| format!("Failed to load history for {symbol}"))?;

        println!("\n=== {} ===", symbol.0);
        println!("Shape: {} rows, 6 columns", bars.len());
        println!("Columns: Date, Open, High, Low, Close, Volume");

        println!("\nFirst 5 rows:");
        print_rows(&bars[..bars.len().min(5)]);
        println!("\nLast 5 rows:");
        print_rows(&bars[bars.len().saturating_sub(5)..]);

        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        if let (Some(first), Some(last)) = (bars.first(), bars.last()) {
            let high = closes.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            let low = closes.iter().cloned().fold(f64::INFINITY, f64::min);
            let mean = closes.iter().sum::<f64>() / closes.len() as f64;
            println!("\nClose price statistics:");
            println!("  Current price: ${:.2} ({})", last.close, last.date);
            println!("  Highest price: ${:.2}", high);
            println!("  Lowest price:  ${:.2}", low);
            println!("  Average price: ${:.2}", mean);
            println!("  Span: {} to {}", first.date, last.date);
        }
    }
    Ok(())
}

fn print_rows(rows: &[BarRow]) {
    println!(
        "  {:<12} {:>10} {:>10} {:>10} {:>10} {:>14}",
        "Date", "Open", "High", "Low", "Close", "Volume"
    );
    for row in rows {
        println!(
            "  {:<12} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>14.0}",
            row.date.to_string(),
            row.open,
            row.high,
            row.low,
            row.close,
            row.volume
        );
    }
}

// --- "Returns" Subcommand Logic ---

fn handle_returns(settings: &Settings) -> Result<()> {
    let store = store(settings);
    let engine = analytics::AnalyticsEngine::new();

    let mut results = Vec::new();
    for symbol in resolve_instruments(settings, None) {
        let series = store
            .load_series(&symbol)
            .with_context(|| format!("Failed to load history for {symbol}"))?;
        let stats = engine.return_stats(&series);
        print_return_stats(&symbol, &stats);
        results.push((symbol, stats));
    }

    print_returns_comparison(&results);
    Ok(())
}

// --- "Correlation" Subcommand Logic ---

fn handle_correlation(settings: &Settings) -> Result<()> {
    let store = store(settings);
    let mut series = Vec::new();
    for symbol in resolve_instruments(settings, None) {
        let prices = store
            .load_series(&symbol)
            .with_context(|| format!("Failed to load history for {symbol}"))?;
        series.push((symbol, prices));
    }

    let matrix = analytics::correlation_matrix(&series);

    let output = charts_dir(settings)?.join("correlation_heatmap.png");
    charts::correlation_heatmap(&matrix, &output)?;
    println!("Correlation heatmap saved to {}", output.display());

    if let Some(((hi_i, hi_j, hi_r), (lo_i, lo_j, lo_r))) = analytics::correlation::extreme_pairs(&matrix) {
        println!("\n--- Correlation Insights ---");
        println!(
            "Highest correlation: {} & {} = {:.3}",
            matrix.symbols[hi_i], matrix.symbols[hi_j], hi_r
        );
        println!(
            "Lowest correlation:  {} & {} = {:.3}",
            matrix.symbols[lo_i], matrix.symbols[lo_j], lo_r
        );
    }
    Ok(())
}

// --- "PriceChart" Subcommand Logic ---

fn handle_price_chart(settings: &Settings) -> Result<()> {
    let store = store(settings);
    let mut series = Vec::new();
    for symbol in resolve_instruments(settings, None) {
        let prices = store
            .load_series(&symbol)
            .with_context(|| format!("Failed to load history for {symbol}"))?;
        series.push((symbol, prices));
    }

    let output = charts_dir(settings)?.join("price_comparison.png");
    charts::price_comparison(&series, &output)?;
    println!("Price comparison chart saved to {}", output.display());
    Ok(())
}

// --- "Backtest" Subcommand Logic ---

/// Backtests every requested instrument. Each run is pure and touches only
/// its own series, so the instruments fan out across a rayon pool.
fn handle_backtest(settings: &Settings, symbol: Option<String>) -> Result<()> {
    let store = store(settings);
    let charts_dir = charts_dir(settings)?;
    let backtester = CrossoverBacktester::new(settings.strategy.crossover.clone());
    let instruments = resolve_instruments(settings, symbol);

    tracing::info!(
        count = instruments.len(),
        short_window = backtester.settings().short_window,
        long_window = backtester.settings().long_window,
        "Running crossover backtests."
    );

    let summaries: Vec<(Symbol, BacktestSummary)> = instruments
        .par_iter()
        .map(|symbol| -> Result<(Symbol, BacktestSummary)> {
            let series = store
                .load_series(symbol)
                .with_context(|| format!("Failed to load history for {symbol}"))?;
            let result = backtester.run(&series)?;

            let output = charts_dir.join(format!("{}_crossover.png", symbol.0));
            charts::strategy_chart(symbol, &result, &output)?;

            Ok((symbol.clone(), result.summary))
        })
        .collect::<Result<_>>()?;

    for (symbol, summary) in &summaries {
        print_backtest_summary(symbol, summary);
    }

    if summaries.len() > 1 {
        let ranked = rank_by_edge(&summaries);
        print_ranking(&ranked);
    }
    Ok(())
}
