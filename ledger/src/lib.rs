//! Call ledger for callscope.
//!
//! Creates call records, transitions them to confirmed, and computes
//! traffic statistics. All durable state lives in the store; the ledger is
//! a stateless engine over it.

pub mod error;
pub mod ledger;
pub mod stats;

pub use error::LedgerError;
pub use ledger::{CallLedger, DEFAULT_HISTORY_LIMIT, DEFAULT_TRAFFIC_LIMIT, UNKNOWN_METHOD};
pub use stats::TrafficStats;
