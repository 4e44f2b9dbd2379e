//! Provider client errors.
//!
//! Internal only: the public fetch surface absorbs these into an empty
//! result per the fail-soft contract.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider answered HTTP {0}")]
    HttpStatus(u16),

    #[error("provider error status: {0}")]
    Provider(String),

    #[error("undecodable provider payload: {0}")]
    Decode(String),
}
