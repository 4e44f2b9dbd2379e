//! Blocklist storage trait.

use crate::StoreError;
use callscope_types::{Address, BlockedAddress};

/// Trait for persisting blocked addresses.
///
/// Address uniqueness is enforced here, not by callers: create-if-absent
/// must run atomically inside the store so concurrent identical requests
/// cannot produce duplicate rows.
pub trait BlocklistStore {
    /// Insert `address` if no row for it exists. Returns the row and
    /// whether it was created by this call (`false` means it already
    /// existed; the existing row is returned unchanged).
    fn insert_blocked(&self, address: &Address) -> Result<(BlockedAddress, bool), StoreError>;

    /// Retrieve the row for `address`, if any.
    fn get_blocked(&self, address: &Address) -> Result<Option<BlockedAddress>, StoreError>;

    /// Delete the row for `address`. Returns whether a row was removed.
    fn delete_blocked(&self, address: &Address) -> Result<bool, StoreError>;

    /// All blocked addresses in insertion order.
    fn list_blocked(&self) -> Result<Vec<BlockedAddress>, StoreError>;

    /// Total number of blocked addresses.
    fn count_blocked(&self) -> Result<u64, StoreError>;
}
