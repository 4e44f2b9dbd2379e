//! External transaction-history integration for callscope.
//!
//! [`ScanClient`] talks to the Etherscan-style provider; [`Reconciler`]
//! merges fetched history into the call store without duplication.

pub mod client;
pub mod error;
pub mod reconciler;

pub use client::{RawTransaction, ScanClient};
pub use error::ScanError;
pub use reconciler::{ReconcileSummary, Reconciler};
