//! Blocklist management for callscope.
//!
//! Tracks which addresses are excluded from further processing.
//! Enforcement of the ban happens at the transport layer; this crate only
//! answers membership queries and keeps the set consistent.

pub mod error;
pub mod manager;

pub use error::BlocklistError;
pub use manager::{BlockOutcome, BlocklistManager};
