//! Historical balance series: raw observations and their reconciliation

mod observation;
mod reconciler;
pub mod loader;

pub use observation::{BalanceObservation, ObservationKind};
pub use reconciler::{ReconciledSeries, Reconciler, ReconcilerConfig, SeriesPoint};
pub use loader::WalletObservations;
