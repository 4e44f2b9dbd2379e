//! Fundamental types for callscope.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: addresses, call records, blocklist rows, and timestamps.

pub mod address;
pub mod blocklist;
pub mod call;
pub mod time;

pub use address::Address;
pub use blocklist::BlockedAddress;
pub use call::{CallId, ContractCall};
pub use time::Timestamp;
