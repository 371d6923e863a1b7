//! CSV-based rate quote loader
//!
//! Loads the pool's rate history from rate_quotes.csv in a data directory.

use std::error::Error;
use std::fs::File;
use std::path::Path;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::{RateHistory, RateQuote, RateSource};

/// Default path to the demo input data
pub const DEFAULT_DATA_PATH: &str = "data/demo";

/// Load rate quotes from rate_quotes.csv
///
/// Columns: source (base|emission), annual_rate (decimal fraction),
/// effective_from (RFC 3339 instant)
pub fn load_rate_quotes(path: &Path) -> Result<Vec<RateQuote>, Box<dyn Error + Send + Sync>> {
    let file = File::open(path.join("rate_quotes.csv"))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut quotes = Vec::new();

    for result in reader.records() {
        let record = result?;
        let source = match &record[0] {
            "base" => RateSource::Base,
            "emission" => RateSource::Emission,
            other => return Err(format!("unknown rate source: {}", other).into()),
        };
        let annual_rate: Decimal = record[1].parse()?;
        let effective_from: DateTime<Utc> = record[2].parse()?;

        quotes.push(RateQuote {
            source,
            annual_rate,
            effective_from,
        });
    }

    Ok(quotes)
}

/// Load the full rate history from a data directory
pub fn load_rate_history(path: &Path) -> Result<RateHistory, Box<dyn Error + Send + Sync>> {
    Ok(RateHistory::new(load_rate_quotes(path)?))
}
