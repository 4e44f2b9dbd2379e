//! Call ledger engine.

use crate::error::LedgerError;
use callscope_store::{CallFilter, CallStore, NewCall};
use callscope_types::{Address, CallId, ContractCall, Timestamp};
use std::sync::Arc;

/// Default result size for recent-traffic queries.
pub const DEFAULT_TRAFFIC_LIMIT: usize = 10;
/// Default result size for wallet-history queries.
pub const DEFAULT_HISTORY_LIMIT: usize = 20;
/// Method name recorded when the caller or provider does not supply one.
pub const UNKNOWN_METHOD: &str = "unknown";

/// The call ledger — creates call records, confirms them, and serves
/// traffic queries.
///
/// Holds no state beyond the store handle; every operation reads and
/// writes through the store. The clock is passed in (`now`) so callers
/// and tests control time.
pub struct CallLedger<S> {
    pub(crate) store: Arc<S>,
}

impl<S> CallLedger<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

impl<S: CallStore> CallLedger<S> {
    /// Record a new pending call.
    ///
    /// `from` and `to` must be non-empty; a blank `method` is stored as
    /// `"unknown"`. The record starts unconfirmed with `call_time = now`.
    /// No duplicate suppression happens at this layer — dedup is
    /// reconciliation-specific.
    pub fn create(
        &self,
        from: Address,
        to: Address,
        method: String,
        now: Timestamp,
    ) -> Result<ContractCall, LedgerError> {
        if from.is_empty() {
            return Err(LedgerError::Validation(
                "from address must not be empty".to_owned(),
            ));
        }
        if to.is_empty() {
            return Err(LedgerError::Validation(
                "to address must not be empty".to_owned(),
            ));
        }
        let new = NewCall {
            from,
            to,
            method: normalize_method(method),
            call_time: now,
            confirmed_at: None,
        };
        Ok(self.store.insert_call(&new)?)
    }

    /// Mark a call confirmed, stamping the confirmation time.
    ///
    /// The stamp is clamped so `confirmed_at` never precedes `call_time`
    /// and never moves backwards across re-confirmations. Re-confirming is
    /// accepted behavior, not an error.
    pub fn confirm(&self, id: CallId, now: Timestamp) -> Result<ContractCall, LedgerError> {
        let mut call = self
            .store
            .get_call(id)?
            .ok_or(LedgerError::CallNotFound(id))?;
        let stamp = now
            .max(call.call_time)
            .max(call.confirmed_at.unwrap_or(Timestamp::EPOCH));
        call.confirmed_at = Some(stamp);
        self.store.update_call(&call)?;
        Ok(call)
    }

    /// The most recent calls, newest first. `limit` defaults to 10 and
    /// must be positive.
    pub fn recent_traffic(&self, limit: Option<usize>) -> Result<Vec<ContractCall>, LedgerError> {
        let limit = effective_limit(limit, DEFAULT_TRAFFIC_LIMIT)?;
        Ok(self.store.find_calls(&CallFilter::All, Some(limit))?)
    }

    /// Calls where `address` appears as sender or recipient, newest first.
    /// `limit` defaults to 20 and must be positive.
    pub fn wallet_history(
        &self,
        address: &Address,
        limit: Option<usize>,
    ) -> Result<Vec<ContractCall>, LedgerError> {
        let limit = effective_limit(limit, DEFAULT_HISTORY_LIMIT)?;
        Ok(self
            .store
            .find_calls(&CallFilter::Involving(address.clone()), Some(limit))?)
    }

    /// Every call sent from `address`, newest first, unbounded.
    pub fn wallet_outbound(&self, address: &Address) -> Result<Vec<ContractCall>, LedgerError> {
        Ok(self
            .store
            .find_calls(&CallFilter::SentBy(address.clone()), None)?)
    }
}

/// Replace a blank method name with the `"unknown"` placeholder.
fn normalize_method(method: String) -> String {
    if method.trim().is_empty() {
        UNKNOWN_METHOD.to_owned()
    } else {
        method
    }
}

fn effective_limit(limit: Option<usize>, default: usize) -> Result<usize, LedgerError> {
    match limit {
        None => Ok(default),
        Some(0) => Err(LedgerError::Validation("limit must be positive".to_owned())),
        Some(n) => Ok(n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use callscope_store_memory::MemoryStore;

    fn ledger() -> CallLedger<MemoryStore> {
        CallLedger::new(Arc::new(MemoryStore::new()))
    }

    fn at(ms: u64) -> Timestamp {
        Timestamp::from_millis(ms)
    }

    #[test]
    fn create_then_recent_traffic_returns_it_first() {
        let ledger = ledger();
        let created = ledger
            .create("0xa".into(), "0xb".into(), "mint".into(), at(100))
            .unwrap();

        let recent = ledger.recent_traffic(Some(1)).unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0], created);
        assert!(recent[0].confirmed_at.is_none());
    }

    #[test]
    fn create_rejects_empty_addresses() {
        let ledger = ledger();
        let empty_from = ledger.create("".into(), "0xb".into(), "mint".into(), at(1));
        assert!(matches!(empty_from, Err(LedgerError::Validation(_))));

        let blank_to = ledger.create("0xa".into(), "   ".into(), "mint".into(), at(1));
        assert!(matches!(blank_to, Err(LedgerError::Validation(_))));
    }

    #[test]
    fn create_defaults_blank_method_to_unknown() {
        let ledger = ledger();
        let call = ledger
            .create("0xa".into(), "0xb".into(), "  ".into(), at(1))
            .unwrap();
        assert_eq!(call.method, UNKNOWN_METHOD);
    }

    #[test]
    fn confirm_stamps_at_or_after_call_time() {
        let ledger = ledger();
        let call = ledger
            .create("0xa".into(), "0xb".into(), "mint".into(), at(100))
            .unwrap();

        // A clock reading behind call_time is clamped up to it.
        let confirmed = ledger.confirm(call.id, at(50)).unwrap();
        assert_eq!(confirmed.confirmed_at, Some(at(100)));

        let confirmed = ledger.confirm(call.id, at(250)).unwrap();
        assert_eq!(confirmed.confirmed_at, Some(at(250)));
    }

    #[test]
    fn reconfirmation_never_moves_backwards() {
        let ledger = ledger();
        let call = ledger
            .create("0xa".into(), "0xb".into(), "mint".into(), at(100))
            .unwrap();

        ledger.confirm(call.id, at(300)).unwrap();
        let again = ledger.confirm(call.id, at(200)).unwrap();
        assert_eq!(again.confirmed_at, Some(at(300)));
    }

    #[test]
    fn confirm_unknown_id_is_not_found() {
        let ledger = ledger();
        let missing = ledger.confirm(CallId::new(404), at(1));
        assert!(matches!(missing, Err(LedgerError::CallNotFound(_))));
    }

    #[test]
    fn recent_traffic_defaults_to_ten() {
        let ledger = ledger();
        for i in 0..12 {
            ledger
                .create("0xa".into(), "0xb".into(), "mint".into(), at(i))
                .unwrap();
        }
        assert_eq!(ledger.recent_traffic(None).unwrap().len(), 10);
    }

    #[test]
    fn recent_traffic_rejects_zero_limit() {
        let ledger = ledger();
        assert!(matches!(
            ledger.recent_traffic(Some(0)),
            Err(LedgerError::Validation(_))
        ));
    }

    #[test]
    fn wallet_history_matches_either_endpoint_newest_first() {
        let ledger = ledger();
        ledger
            .create("0xa".into(), "0xb".into(), "mint".into(), at(10))
            .unwrap();
        ledger
            .create("0xc".into(), "0xa".into(), "burn".into(), at(30))
            .unwrap();
        ledger
            .create("0xc".into(), "0xd".into(), "mint".into(), at(20))
            .unwrap();

        let history = ledger.wallet_history(&"0xa".into(), None).unwrap();
        let times: Vec<u64> = history.iter().map(|c| c.call_time.as_millis()).collect();
        assert_eq!(times, vec![30, 10]);
    }

    #[test]
    fn wallet_history_defaults_to_twenty() {
        let ledger = ledger();
        for i in 0..25 {
            ledger
                .create("0xa".into(), "0xb".into(), "mint".into(), at(i))
                .unwrap();
        }
        assert_eq!(ledger.wallet_history(&"0xa".into(), None).unwrap().len(), 20);
    }

    #[test]
    fn wallet_outbound_is_sender_only_and_unbounded() {
        let ledger = ledger();
        for i in 0..25 {
            ledger
                .create("0xa".into(), "0xb".into(), "mint".into(), at(i))
                .unwrap();
        }
        ledger
            .create("0xb".into(), "0xa".into(), "mint".into(), at(99))
            .unwrap();

        let outbound = ledger.wallet_outbound(&"0xa".into()).unwrap();
        assert_eq!(outbound.len(), 25);
        assert!(outbound.iter().all(|c| c.from == "0xa".into()));
    }
}
