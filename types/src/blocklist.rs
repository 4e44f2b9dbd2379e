//! Blocked-address records.

use crate::Address;
use serde::{Deserialize, Serialize};

/// An address flagged for exclusion from further processing.
///
/// At most one row exists per address value. Enforcement of the ban is the
/// transport layer's concern; the core only tracks membership.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockedAddress {
    pub id: u64,
    pub address: Address,
}
