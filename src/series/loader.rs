//! CSV-based observation loaders
//!
//! Reads historical balance rows the data layer would normally supply:
//! observations.csv for a single wallet, wallet_observations.csv for a
//! block of wallets.

use std::error::Error;
use std::fs::File;
use std::path::Path;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::observation::{BalanceObservation, ObservationKind};

/// Observation history for one wallet in a block run
#[derive(Debug, Clone)]
pub struct WalletObservations {
    pub wallet: String,
    pub observations: Vec<BalanceObservation>,
}

fn parse_kind(value: &str) -> Result<ObservationKind, Box<dyn Error + Send + Sync>> {
    match value {
        "deposit" => Ok(ObservationKind::Deposit),
        "withdrawal" => Ok(ObservationKind::Withdrawal),
        "snapshot" => Ok(ObservationKind::Snapshot),
        other => Err(format!("unknown observation kind: {}", other).into()),
    }
}

/// Load a single wallet's history from observations.csv
///
/// Columns: timestamp (RFC 3339), kind (deposit|withdrawal|snapshot), amount
pub fn load_observations(
    path: &Path,
) -> Result<Vec<BalanceObservation>, Box<dyn Error + Send + Sync>> {
    let file = File::open(path.join("observations.csv"))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut observations = Vec::new();

    for result in reader.records() {
        let record = result?;
        let timestamp: DateTime<Utc> = record[0].parse()?;
        let kind = parse_kind(&record[1])?;
        let amount: Decimal = record[2].parse()?;

        observations.push(BalanceObservation {
            timestamp,
            amount,
            kind,
        });
    }

    Ok(observations)
}

/// Load a block of wallets from wallet_observations.csv, grouped per wallet
/// in first-seen order
///
/// Columns: wallet, timestamp, kind, amount
pub fn load_wallet_observations(
    path: &Path,
) -> Result<Vec<WalletObservations>, Box<dyn Error + Send + Sync>> {
    let file = File::open(path.join("wallet_observations.csv"))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut wallets: Vec<WalletObservations> = Vec::new();

    for result in reader.records() {
        let record = result?;
        let wallet = &record[0];
        let observation = BalanceObservation {
            timestamp: record[1].parse()?,
            kind: parse_kind(&record[2])?,
            amount: record[3].parse()?,
        };

        match wallets.iter_mut().find(|w| w.wallet == wallet) {
            Some(entry) => entry.observations.push(observation),
            None => wallets.push(WalletObservations {
                wallet: wallet.to_string(),
                observations: vec![observation],
            }),
        }
    }

    Ok(wallets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::loader::DEFAULT_DATA_PATH;

    #[test]
    fn test_load_demo_observations() {
        let result = load_observations(Path::new(DEFAULT_DATA_PATH));
        assert!(
            result.is_ok(),
            "Failed to load observations: {:?}",
            result.err()
        );

        let observations = result.unwrap();
        assert!(observations.len() >= 5);
        assert_eq!(observations[0].kind, ObservationKind::Deposit);
        assert!(observations.iter().all(|o| o.amount > Decimal::ZERO));
    }

    #[test]
    fn test_load_demo_wallet_block() {
        let wallets = load_wallet_observations(Path::new(DEFAULT_DATA_PATH)).unwrap();
        assert!(wallets.len() >= 2);
        assert!(wallets.iter().all(|w| !w.observations.is_empty()));

        // Grouping preserves first-seen wallet order and row order within
        let first = &wallets[0];
        for pair in first.observations.windows(2) {
            assert!(pair[0].timestamp <= pair[1].timestamp);
        }
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        assert!(parse_kind("transfer").is_err());
    }
}
