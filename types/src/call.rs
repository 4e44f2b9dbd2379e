//! Contract-call records and identifiers.

use crate::{Address, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Store-assigned identifier of a [`ContractCall`], strictly increasing
/// per store instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CallId(u64);

impl CallId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One observed or synthesized contract invocation.
///
/// A call starts pending (`confirmed_at` absent) and is later confirmed.
/// Once set, `confirmed_at` is never cleared and never precedes
/// `call_time`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractCall {
    pub id: CallId,
    pub from: Address,
    pub to: Address,
    pub method: String,
    pub call_time: Timestamp,
    pub confirmed_at: Option<Timestamp>,
}

impl ContractCall {
    pub fn is_confirmed(&self) -> bool {
        self.confirmed_at.is_some()
    }

    /// Confirmation latency in milliseconds, if confirmed.
    pub fn latency_ms(&self) -> Option<u64> {
        self.confirmed_at.map(|c| c.millis_since(self.call_time))
    }

    /// Whether `address` appears as sender or recipient.
    pub fn involves(&self, address: &Address) -> bool {
        &self.from == address || &self.to == address
    }
}
