//! Run the chart engine for an entire block of wallets
//!
//! Reads wallet_observations.csv and rate_quotes.csv, runs every wallet in
//! parallel for one display period, and writes per-date aggregate totals for
//! comparison against the dashboard's pool-level numbers.

use std::collections::BTreeMap;
use std::env;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use chrono::{NaiveDate, Utc};
use rayon::prelude::*;
use rust_decimal::Decimal;

use yield_engine::rates::loader::{load_rate_history, DEFAULT_DATA_PATH};
use yield_engine::runner::BatchRunner;
use yield_engine::series::loader::load_wallet_observations;
use yield_engine::{ChartPayload, EngineError, WalletPeriod};

/// Aggregated per-date totals across all wallets
#[derive(Debug, Clone, Default)]
struct AggregatedRow {
    wallets: usize,
    total_balance: Decimal,
    total_deposit: Decimal,
    total_yield: Decimal,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let start = Instant::now();
    let data_dir = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));

    println!("Loading wallets from {}...", data_dir.display());
    let wallets = load_wallet_observations(&data_dir)
        .map_err(|e| anyhow::anyhow!("loading wallet observations: {e}"))?;
    let rates = load_rate_history(&data_dir)
        .map_err(|e| anyhow::anyhow!("loading rate quotes: {e}"))?;
    println!("Loaded {} wallets in {:?}", wallets.len(), start.elapsed());

    let runner = BatchRunner::new(rates);
    let period = WalletPeriod::Month;
    let now = Utc::now();

    println!("Running projections...");
    let proj_start = Instant::now();

    // The engine is stateless, so wallets fan out freely
    let results: Vec<(String, Result<ChartPayload, EngineError>)> = wallets
        .par_iter()
        .map(|w| (w.wallet.clone(), runner.run(&w.observations, period, now)))
        .collect();

    println!(
        "Projected {} wallets in {:?}",
        results.len(),
        proj_start.elapsed()
    );

    // Aggregate per-date totals across the block
    let mut totals: BTreeMap<NaiveDate, AggregatedRow> = BTreeMap::new();
    let mut skipped = 0usize;
    for (wallet, result) in &results {
        match result {
            Ok(payload) => {
                for point in &payload.series {
                    let row = totals.entry(point.date).or_default();
                    row.wallets += 1;
                    row.total_balance += point.balance;
                    row.total_deposit += point.deposit;
                    row.total_yield += point.earned;
                }
            }
            Err(e) => {
                skipped += 1;
                eprintln!("  wallet {}: {}", wallet, e);
            }
        }
    }

    // Write aggregated rows to CSV
    let csv_path = "block_chart.csv";
    let mut file = File::create(csv_path)?;
    writeln!(file, "date,wallets,total_balance,total_deposit,total_yield")?;
    for (date, row) in &totals {
        writeln!(
            file,
            "{},{},{},{},{}",
            date, row.wallets, row.total_balance, row.total_deposit, row.total_yield
        )?;
    }

    println!("\nAggregate results written to: {}", csv_path);
    if skipped > 0 {
        println!("Skipped {} wallets with no history", skipped);
    }

    // Print the block's latest totals
    if let Some((date, row)) = totals.iter().next_back() {
        println!("\nLatest date {} across {} wallets:", date, row.wallets);
        println!("  Total Balance: {}", row.total_balance.round_dp(6));
        println!("  Total Deposit: {}", row.total_deposit.round_dp(6));
        println!("  Total Yield:   {}", row.total_yield.round_dp(6));
    }
    println!("Total time: {:?}", start.elapsed());

    Ok(())
}
