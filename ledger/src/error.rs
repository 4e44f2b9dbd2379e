//! Ledger-specific errors.

use callscope_types::CallId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("call {0} not found")]
    CallNotFound(CallId),

    #[error("invalid request: {0}")]
    Validation(String),

    #[error("store error: {0}")]
    Store(#[from] callscope_store::StoreError),
}
