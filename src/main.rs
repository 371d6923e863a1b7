//! Yield Engine CLI
//!
//! Loads balance observations and rate quotes from CSV, runs the engine for
//! one wallet period, prints the chart series and summary, and writes the
//! full series to a CSV file.

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use rust_decimal::Decimal;

use yield_engine::rates::loader::{load_rate_history, DEFAULT_DATA_PATH};
use yield_engine::series::loader::load_observations;
use yield_engine::{BalanceEngine, EngineConfig, RateSource, WalletPeriod};

#[derive(Debug, Parser)]
#[command(name = "yield_engine", about = "Balance and yield projection engine")]
struct Args {
    /// Directory containing observations.csv and rate_quotes.csv
    #[arg(long, default_value = DEFAULT_DATA_PATH)]
    data_dir: PathBuf,

    /// Wallet display period: 24h, 7d or 1mo
    #[arg(long, default_value = "1mo")]
    period: WalletPeriod,

    /// Print the payload as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Path for the CSV dump of the chart series
    #[arg(long, default_value = "chart_output.csv")]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    if !args.json {
        println!("Yield Engine v0.1.0");
        println!("===================\n");
    }

    let rates = load_rate_history(&args.data_dir).map_err(|e| {
        anyhow::anyhow!("loading rate quotes from {}: {}", args.data_dir.display(), e)
    })?;
    let observations = load_observations(&args.data_dir).map_err(|e| {
        anyhow::anyhow!("loading observations from {}: {}", args.data_dir.display(), e)
    })?;

    let engine = BalanceEngine::new(EngineConfig::default());
    let payload = engine
        .chart(&observations, &rates, args.period, Utc::now())
        .context("engine run failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!("Wallet history: {} observations", observations.len());
    println!(
        "Current rates:  base {}%, emission {}%\n",
        rates.current_rate(RateSource::Base) * Decimal::ONE_HUNDRED,
        rates.current_rate(RateSource::Emission) * Decimal::ONE_HUNDRED,
    );

    // Print the series to console
    println!(
        "Chart series ({} points, period {}):",
        payload.series.len(),
        args.period
    );
    println!(
        "{:>12} {:>16} {:>16} {:>14} {:>11}",
        "Date", "Balance", "Deposit", "Yield", "Type"
    );
    println!("{}", "-".repeat(74));

    for point in &payload.series {
        println!(
            "{:>12} {:>16} {:>16} {:>14} {:>11}",
            point.date.to_string(),
            point.balance.round_dp(6),
            point.deposit.round_dp(6),
            point.earned.round_dp(6),
            point.regime.as_str(),
        );
    }

    // Write the full series to CSV
    let mut file = File::create(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    writeln!(file, "date,balance,deposit,yield,type")?;
    for point in &payload.series {
        writeln!(
            file,
            "{},{},{},{},{}",
            point.date,
            point.balance,
            point.deposit,
            point.earned,
            point.regime.as_str(),
        )?;
    }
    println!("\nFull series written to: {}", args.output.display());

    // Print summary
    let summary = &payload.summary;
    println!("\nSummary:");
    println!("  Display Balance:    {}", summary.display_balance);
    println!("  Interest Earned:    {}", summary.interest_earned.round_dp(6));
    println!(
        "  Annual Yield Est.:  {}",
        summary.annual_yield_estimate.round_dp(6)
    );
    println!(
        "  Growth:             {}%",
        summary.growth_percentage.round_dp(4)
    );
    println!("  Base APY:           {}%", summary.base_apy_percentage);
    println!("  Emission APY:       {}%", summary.emission_apy_percentage);

    Ok(())
}
