//! Free-form address type for call endpoints.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An on-chain address as reported by callers or the history provider.
///
/// Stored verbatim; no checksum or hex validation is applied. Emptiness is
/// the only property the core checks: the ledger and blocklist reject
/// empty addresses at their ingestion boundaries. Reconciliation stores
/// provider records as-is, so a contract-creation record keeps its empty
/// `to`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    /// Create a new address from a raw string.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the address is empty after trimming whitespace.
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Address {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}
