//! Aggregate traffic statistics.

use crate::error::LedgerError;
use crate::ledger::CallLedger;
use callscope_store::{BlocklistStore, CallStore};
use serde::{Deserialize, Serialize};

/// Ledger-wide counters.
///
/// Field names serialize in camelCase, the shape the API exposes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficStats {
    pub total_calls: u64,
    pub blocked_percentage: f64,
    pub average_latency_ms: f64,
}

impl<S: CallStore> CallLedger<S> {
    /// Mean confirmation latency in milliseconds, rounded to 2 decimals.
    /// Defined as 0 when no call has ever been confirmed.
    pub fn average_latency_ms(&self) -> Result<f64, LedgerError> {
        let avg = self.store.average_confirm_latency_ms()?.unwrap_or(0.0);
        Ok(round2(avg))
    }
}

impl<S: CallStore + BlocklistStore> CallLedger<S> {
    /// Compute ledger-wide statistics.
    ///
    /// `blocked_percentage = blocked / (total + 1) × 100`, rounded to 2
    /// decimals. The +1 keeps the division defined on an empty ledger; it
    /// is a known approximation, kept deliberately.
    pub fn stats(&self) -> Result<TrafficStats, LedgerError> {
        let total_calls = self.store.count_calls()?;
        let blocked = self.store.count_blocked()?;
        let blocked_percentage = round2(blocked as f64 / (total_calls as f64 + 1.0) * 100.0);
        Ok(TrafficStats {
            total_calls,
            blocked_percentage,
            average_latency_ms: self.average_latency_ms()?,
        })
    }
}

/// Round to 2 decimal places.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
