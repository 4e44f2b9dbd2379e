//! Reconciliation of provider history into the local call store.

use crate::client::{RawTransaction, ScanClient};
use callscope_store::{CallStore, NewCall, StoreError};
use callscope_types::Address;
use std::sync::Arc;

/// Counters from one reconciliation pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    /// Records the provider returned.
    pub fetched: usize,
    /// New rows written to the store.
    pub merged: usize,
    /// Records skipped because their `(from, to, call_time)` triple already
    /// existed, or repeated within the batch.
    pub duplicates: usize,
    /// Records skipped for a missing or unparseable timestamp.
    pub malformed: usize,
}

/// Merges externally sourced transaction records into the call store
/// without duplication.
pub struct Reconciler<S> {
    store: Arc<S>,
    client: ScanClient,
}

impl<S> Reconciler<S> {
    pub fn new(store: Arc<S>, client: ScanClient) -> Self {
        Self { store, client }
    }
}

impl<S: CallStore> Reconciler<S> {
    /// Fetch the wallet's provider history and merge it.
    ///
    /// Provider failures surface as zero fetched records, never as an
    /// error; only store faults can fail this call.
    pub async fn sync_wallet(&self, address: &Address) -> Result<ReconcileSummary, StoreError> {
        let records = self.client.fetch_transactions(address).await;
        let summary = self.merge(&records)?;
        tracing::info!(
            wallet = %address,
            fetched = summary.fetched,
            merged = summary.merged,
            duplicates = summary.duplicates,
            malformed = summary.malformed,
            "wallet reconciliation complete"
        );
        Ok(summary)
    }

    /// Merge raw provider records into the store.
    ///
    /// A record becomes a confirmed call at its provider timestamp; the
    /// timestamp is treated as proof of finality. Records without a usable
    /// timestamp cannot be merged idempotently (the dedup key includes
    /// call_time) and are skipped as malformed. The dedup itself runs in
    /// the store as one atomic batch; two distinct transactions sharing
    /// the same `(from, to, call_time)` triple collide by design.
    pub fn merge(&self, records: &[RawTransaction]) -> Result<ReconcileSummary, StoreError> {
        let mut summary = ReconcileSummary {
            fetched: records.len(),
            ..ReconcileSummary::default()
        };

        let mut batch = Vec::with_capacity(records.len());
        for record in records {
            let call_time = match record.timestamp() {
                Some(ts) => ts,
                None => {
                    tracing::debug!(
                        from = %record.from,
                        to = %record.to,
                        "skipping provider record without usable timestamp"
                    );
                    summary.malformed += 1;
                    continue;
                }
            };
            batch.push(NewCall {
                from: Address::new(record.from.clone()),
                to: Address::new(record.to.clone()),
                method: record.method(),
                call_time,
                confirmed_at: Some(call_time),
            });
        }

        let inserted = self.store.insert_calls_if_absent(&batch)?;
        summary.merged = inserted.len();
        summary.duplicates = batch.len() - inserted.len();
        Ok(summary)
    }
}
