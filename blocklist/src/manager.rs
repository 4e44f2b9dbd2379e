//! Blocklist manager engine.

use crate::error::BlocklistError;
use callscope_store::BlocklistStore;
use callscope_types::{Address, BlockedAddress};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Result of a block request.
///
/// `created` is false when the address was already blocked; the existing
/// row is returned unchanged either way. Already-blocked is information,
/// not an error.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockOutcome {
    pub created: bool,
    pub record: BlockedAddress,
}

/// The blocklist manager — membership tracking for excluded addresses.
///
/// Uniqueness is the store's job (atomic create-if-absent); this engine
/// never does a separate read-then-write.
pub struct BlocklistManager<S> {
    store: Arc<S>,
}

impl<S> BlocklistManager<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

impl<S: BlocklistStore> BlocklistManager<S> {
    /// Block an address, or report the existing row when already blocked.
    pub fn block(&self, address: &Address) -> Result<BlockOutcome, BlocklistError> {
        if address.is_empty() {
            return Err(BlocklistError::Validation(
                "address must not be empty".to_owned(),
            ));
        }
        let (record, created) = self.store.insert_blocked(address)?;
        Ok(BlockOutcome { created, record })
    }

    /// Unblock an address. Returns whether a row was removed; absence is
    /// not an error.
    pub fn unblock(&self, address: &Address) -> Result<bool, BlocklistError> {
        Ok(self.store.delete_blocked(address)?)
    }

    /// The row for `address`, if blocked.
    pub fn get(&self, address: &Address) -> Result<Option<BlockedAddress>, BlocklistError> {
        Ok(self.store.get_blocked(address)?)
    }

    /// Pure membership test; absence yields false, never an error.
    pub fn is_blocked(&self, address: &Address) -> Result<bool, BlocklistError> {
        Ok(self.store.get_blocked(address)?.is_some())
    }

    /// All blocked addresses in insertion order.
    pub fn list_all(&self) -> Result<Vec<BlockedAddress>, BlocklistError> {
        Ok(self.store.list_blocked()?)
    }
}
