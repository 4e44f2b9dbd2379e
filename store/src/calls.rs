//! Contract-call storage trait.

use crate::StoreError;
use callscope_types::{Address, CallId, ContractCall, Timestamp};
use serde::{Deserialize, Serialize};

/// Insert payload for a contract call: a [`ContractCall`] without the
/// store-assigned identifier.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewCall {
    pub from: Address,
    pub to: Address,
    pub method: String,
    pub call_time: Timestamp,
    pub confirmed_at: Option<Timestamp>,
}

impl NewCall {
    /// The `(from, to, call_time)` triple that identifies a call row for
    /// reconciliation dedup. Does not include method or any external
    /// transaction id.
    pub fn dedup_key(&self) -> (String, String, u64) {
        (
            self.from.as_str().to_owned(),
            self.to.as_str().to_owned(),
            self.call_time.as_millis(),
        )
    }
}

/// Row filters accepted by [`CallStore::find_calls`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallFilter {
    /// Every call.
    All,
    /// Calls where the address is sender or recipient.
    Involving(Address),
    /// Calls sent from the address.
    SentBy(Address),
}

/// Trait for persisting contract calls.
///
/// Results of [`find_calls`](CallStore::find_calls) are always ordered by
/// call time descending (ties broken by id descending), the only ordering
/// the ledger consumes. The `(from, to, call_time)` triple of a row is
/// fixed at insert; updates only touch confirmation state.
pub trait CallStore {
    /// Insert a call unconditionally and return the persisted record with
    /// its assigned id.
    fn insert_call(&self, new: &NewCall) -> Result<ContractCall, StoreError>;

    /// Insert every call in `batch` whose `(from, to, call_time)` triple is
    /// not already present, in one atomic pass. Duplicates within the batch
    /// itself are also skipped. Returns the records actually inserted.
    fn insert_calls_if_absent(&self, batch: &[NewCall]) -> Result<Vec<ContractCall>, StoreError>;

    /// Retrieve a call by id.
    fn get_call(&self, id: CallId) -> Result<Option<ContractCall>, StoreError>;

    /// Overwrite the stored record with the same id as `call`.
    fn update_call(&self, call: &ContractCall) -> Result<(), StoreError>;

    /// Calls matching `filter`, newest first, at most `limit` when given.
    fn find_calls(
        &self,
        filter: &CallFilter,
        limit: Option<usize>,
    ) -> Result<Vec<ContractCall>, StoreError>;

    /// Total number of call rows.
    fn count_calls(&self) -> Result<u64, StoreError>;

    /// Mean of `(confirmed_at - call_time)` in milliseconds over confirmed
    /// calls; `None` when no call has been confirmed.
    fn average_confirm_latency_ms(&self) -> Result<Option<f64>, StoreError>;
}
