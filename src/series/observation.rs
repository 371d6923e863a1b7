//! Balance observation records supplied by the data layer

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Kind of on-chain balance observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObservationKind {
    /// Principal moved into the pool; amount is the transfer size
    Deposit,
    /// Principal moved out of the pool; amount is the transfer size
    Withdrawal,
    /// Observed total balance; change versus the running balance is yield
    Snapshot,
}

impl ObservationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObservationKind::Deposit => "deposit",
            ObservationKind::Withdrawal => "withdrawal",
            ObservationKind::Snapshot => "snapshot",
        }
    }

    /// Whether the observation moves principal (affects the cost basis)
    pub fn is_flow(&self) -> bool {
        matches!(self, ObservationKind::Deposit | ObservationKind::Withdrawal)
    }
}

/// A single historical balance observation for one wallet
///
/// Immutable once recorded. Ordered by timestamp; ties keep insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BalanceObservation {
    /// Instant the observation was recorded
    pub timestamp: DateTime<Utc>,

    /// Transfer amount for deposits and withdrawals, observed total balance
    /// for snapshots
    pub amount: Decimal,

    /// What the amount represents
    pub kind: ObservationKind,
}

impl BalanceObservation {
    pub fn deposit(timestamp: DateTime<Utc>, amount: Decimal) -> Self {
        Self {
            timestamp,
            amount,
            kind: ObservationKind::Deposit,
        }
    }

    pub fn withdrawal(timestamp: DateTime<Utc>, amount: Decimal) -> Self {
        Self {
            timestamp,
            amount,
            kind: ObservationKind::Withdrawal,
        }
    }

    pub fn snapshot(timestamp: DateTime<Utc>, amount: Decimal) -> Self {
        Self {
            timestamp,
            amount,
            kind: ObservationKind::Snapshot,
        }
    }
}
