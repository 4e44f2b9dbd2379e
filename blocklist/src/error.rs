//! Blocklist-specific errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlocklistError {
    #[error("invalid request: {0}")]
    Validation(String),

    #[error("store error: {0}")]
    Store(#[from] callscope_store::StoreError),
}
