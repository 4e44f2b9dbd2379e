//! Mutex-guarded table store.

use callscope_store::{BlocklistStore, CallFilter, CallStore, NewCall, StoreError};
use callscope_types::{Address, BlockedAddress, CallId, ContractCall};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

/// An in-memory call + blocklist store.
///
/// All tables share one lock: the blocklist's create-if-absent and the
/// reconciler's batch dedup are check-then-insert sequences that must not
/// interleave with concurrent identical requests.
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

struct Inner {
    next_call_id: u64,
    calls: BTreeMap<u64, ContractCall>,
    /// Unique index over `(from, to, call_time)`, the reconciliation
    /// dedup key.
    call_keys: HashSet<(String, String, u64)>,
    next_blocked_id: u64,
    blocked: BTreeMap<u64, BlockedAddress>,
    /// Address value to row id; enforces one row per address.
    blocked_index: HashMap<String, u64>,
}

impl Inner {
    fn insert_call_row(&mut self, new: &NewCall) -> ContractCall {
        let id = self.next_call_id;
        self.next_call_id += 1;
        let call = ContractCall {
            id: CallId::new(id),
            from: new.from.clone(),
            to: new.to.clone(),
            method: new.method.clone(),
            call_time: new.call_time,
            confirmed_at: new.confirmed_at,
        };
        self.call_keys.insert(new.dedup_key());
        self.calls.insert(id, call.clone());
        call
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                next_call_id: 1,
                calls: BTreeMap::new(),
                call_keys: HashSet::new(),
                next_blocked_id: 1,
                blocked: BTreeMap::new(),
                blocked_index: HashMap::new(),
            }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Backend("store mutex poisoned".to_owned()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CallStore for MemoryStore {
    fn insert_call(&self, new: &NewCall) -> Result<ContractCall, StoreError> {
        Ok(self.lock()?.insert_call_row(new))
    }

    fn insert_calls_if_absent(&self, batch: &[NewCall]) -> Result<Vec<ContractCall>, StoreError> {
        let mut inner = self.lock()?;
        let mut inserted = Vec::new();
        for new in batch {
            if inner.call_keys.contains(&new.dedup_key()) {
                continue;
            }
            inserted.push(inner.insert_call_row(new));
        }
        Ok(inserted)
    }

    fn get_call(&self, id: CallId) -> Result<Option<ContractCall>, StoreError> {
        Ok(self.lock()?.calls.get(&id.as_u64()).cloned())
    }

    fn update_call(&self, call: &ContractCall) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        match inner.calls.get_mut(&call.id.as_u64()) {
            Some(row) => {
                *row = call.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound(format!("call {}", call.id))),
        }
    }

    fn find_calls(
        &self,
        filter: &CallFilter,
        limit: Option<usize>,
    ) -> Result<Vec<ContractCall>, StoreError> {
        let inner = self.lock()?;
        let mut rows: Vec<ContractCall> = inner
            .calls
            .values()
            .filter(|call| match filter {
                CallFilter::All => true,
                CallFilter::Involving(address) => call.involves(address),
                CallFilter::SentBy(address) => &call.from == address,
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.call_time.cmp(&a.call_time).then(b.id.cmp(&a.id)));
        if let Some(limit) = limit {
            rows.truncate(limit);
        }
        Ok(rows)
    }

    fn count_calls(&self) -> Result<u64, StoreError> {
        Ok(self.lock()?.calls.len() as u64)
    }

    fn average_confirm_latency_ms(&self) -> Result<Option<f64>, StoreError> {
        let inner = self.lock()?;
        let latencies: Vec<u64> = inner
            .calls
            .values()
            .filter_map(|call| call.latency_ms())
            .collect();
        if latencies.is_empty() {
            return Ok(None);
        }
        let sum: f64 = latencies.iter().map(|&ms| ms as f64).sum();
        Ok(Some(sum / latencies.len() as f64))
    }
}

impl BlocklistStore for MemoryStore {
    fn insert_blocked(&self, address: &Address) -> Result<(BlockedAddress, bool), StoreError> {
        let mut inner = self.lock()?;
        if let Some(id) = inner.blocked_index.get(address.as_str()).copied() {
            if let Some(existing) = inner.blocked.get(&id) {
                return Ok((existing.clone(), false));
            }
        }
        let id = inner.next_blocked_id;
        inner.next_blocked_id += 1;
        let record = BlockedAddress {
            id,
            address: address.clone(),
        };
        inner.blocked.insert(id, record.clone());
        inner.blocked_index.insert(address.as_str().to_owned(), id);
        Ok((record, true))
    }

    fn get_blocked(&self, address: &Address) -> Result<Option<BlockedAddress>, StoreError> {
        let inner = self.lock()?;
        let id = match inner.blocked_index.get(address.as_str()) {
            Some(id) => *id,
            None => return Ok(None),
        };
        Ok(inner.blocked.get(&id).cloned())
    }

    fn delete_blocked(&self, address: &Address) -> Result<bool, StoreError> {
        let mut inner = self.lock()?;
        match inner.blocked_index.remove(address.as_str()) {
            Some(id) => Ok(inner.blocked.remove(&id).is_some()),
            None => Ok(false),
        }
    }

    fn list_blocked(&self) -> Result<Vec<BlockedAddress>, StoreError> {
        Ok(self.lock()?.blocked.values().cloned().collect())
    }

    fn count_blocked(&self) -> Result<u64, StoreError> {
        Ok(self.lock()?.blocked.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use callscope_types::Timestamp;

    fn call(from: &str, to: &str, at: u64) -> NewCall {
        NewCall {
            from: Address::from(from),
            to: Address::from(to),
            method: "transfer".to_owned(),
            call_time: Timestamp::from_millis(at),
            confirmed_at: None,
        }
    }

    fn confirmed(from: &str, to: &str, at: u64, confirmed_at: u64) -> NewCall {
        NewCall {
            confirmed_at: Some(Timestamp::from_millis(confirmed_at)),
            ..call(from, to, at)
        }
    }

    #[test]
    fn insert_assigns_increasing_ids() {
        let store = MemoryStore::new();
        let first = store.insert_call(&call("a", "b", 10)).unwrap();
        let second = store.insert_call(&call("a", "b", 20)).unwrap();
        assert_eq!(first.id, CallId::new(1));
        assert_eq!(second.id, CallId::new(2));
        assert_eq!(store.count_calls().unwrap(), 2);
    }

    #[test]
    fn get_missing_call_returns_none() {
        let store = MemoryStore::new();
        assert!(store.get_call(CallId::new(99)).unwrap().is_none());
    }

    #[test]
    fn update_rewrites_the_stored_row() {
        let store = MemoryStore::new();
        let mut stored = store.insert_call(&call("a", "b", 10)).unwrap();
        stored.confirmed_at = Some(Timestamp::from_millis(42));
        store.update_call(&stored).unwrap();

        let fetched = store.get_call(stored.id).unwrap().unwrap();
        assert_eq!(fetched.confirmed_at, Some(Timestamp::from_millis(42)));
    }

    #[test]
    fn update_missing_call_is_not_found() {
        let store = MemoryStore::new();
        let mut ghost = store.insert_call(&call("a", "b", 10)).unwrap();
        ghost.id = CallId::new(77);
        assert!(matches!(
            store.update_call(&ghost),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn find_calls_orders_newest_first_with_id_tiebreak() {
        let store = MemoryStore::new();
        store.insert_call(&call("a", "b", 10)).unwrap();
        store.insert_call(&call("a", "b", 30)).unwrap();
        store.insert_call(&call("a", "b", 20)).unwrap();
        store.insert_call(&call("c", "d", 30)).unwrap();

        let rows = store.find_calls(&CallFilter::All, None).unwrap();
        let times: Vec<u64> = rows.iter().map(|c| c.call_time.as_millis()).collect();
        assert_eq!(times, vec![30, 30, 20, 10]);
        // Same call_time: the later insert (higher id) comes first.
        assert_eq!(rows[0].id, CallId::new(4));
        assert_eq!(rows[1].id, CallId::new(2));
    }

    #[test]
    fn find_calls_respects_limit() {
        let store = MemoryStore::new();
        for at in 1..=5 {
            store.insert_call(&call("a", "b", at)).unwrap();
        }
        let rows = store.find_calls(&CallFilter::All, Some(2)).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].call_time.as_millis(), 5);
    }

    #[test]
    fn find_calls_filters_by_involvement() {
        let store = MemoryStore::new();
        store.insert_call(&call("alice", "bob", 10)).unwrap();
        store.insert_call(&call("carol", "alice", 20)).unwrap();
        store.insert_call(&call("carol", "dave", 30)).unwrap();

        let rows = store
            .find_calls(&CallFilter::Involving(Address::from("alice")), None)
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|c| c.involves(&Address::from("alice"))));
    }

    #[test]
    fn find_calls_filters_by_sender() {
        let store = MemoryStore::new();
        store.insert_call(&call("alice", "bob", 10)).unwrap();
        store.insert_call(&call("bob", "alice", 20)).unwrap();

        let rows = store
            .find_calls(&CallFilter::SentBy(Address::from("alice")), None)
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].from, Address::from("alice"));
    }

    #[test]
    fn insert_if_absent_skips_existing_triple() {
        let store = MemoryStore::new();
        store.insert_call(&call("a", "b", 10)).unwrap();

        let inserted = store
            .insert_calls_if_absent(&[call("a", "b", 10), call("a", "b", 20)])
            .unwrap();
        assert_eq!(inserted.len(), 1);
        assert_eq!(inserted[0].call_time.as_millis(), 20);
        assert_eq!(store.count_calls().unwrap(), 2);
    }

    #[test]
    fn insert_if_absent_skips_duplicates_within_batch() {
        let store = MemoryStore::new();
        let inserted = store
            .insert_calls_if_absent(&[call("a", "b", 10), call("a", "b", 10)])
            .unwrap();
        assert_eq!(inserted.len(), 1);
        assert_eq!(store.count_calls().unwrap(), 1);
    }

    #[test]
    fn average_latency_covers_confirmed_calls_only() {
        let store = MemoryStore::new();
        store.insert_call(&confirmed("a", "b", 100, 300)).unwrap();
        store.insert_call(&confirmed("a", "b", 200, 300)).unwrap();
        store.insert_call(&call("a", "b", 400)).unwrap();

        // (200 + 100) / 2
        assert_eq!(store.average_confirm_latency_ms().unwrap(), Some(150.0));
    }

    #[test]
    fn average_latency_none_when_nothing_confirmed() {
        let store = MemoryStore::new();
        store.insert_call(&call("a", "b", 100)).unwrap();
        assert_eq!(store.average_confirm_latency_ms().unwrap(), None);
    }

    #[test]
    fn blocked_insert_is_create_if_absent() {
        let store = MemoryStore::new();
        let (first, created) = store.insert_blocked(&Address::from("0xbad")).unwrap();
        assert!(created);

        let (second, created) = store.insert_blocked(&Address::from("0xbad")).unwrap();
        assert!(!created);
        assert_eq!(first.id, second.id);
        assert_eq!(store.count_blocked().unwrap(), 1);
    }

    #[test]
    fn blocked_delete_reports_presence() {
        let store = MemoryStore::new();
        store.insert_blocked(&Address::from("0xbad")).unwrap();
        assert!(store.delete_blocked(&Address::from("0xbad")).unwrap());
        assert!(!store.delete_blocked(&Address::from("0xbad")).unwrap());
        assert_eq!(store.count_blocked().unwrap(), 0);
    }

    #[test]
    fn blocked_listed_in_insertion_order() {
        let store = MemoryStore::new();
        store.insert_blocked(&Address::from("one")).unwrap();
        store.insert_blocked(&Address::from("two")).unwrap();
        store.insert_blocked(&Address::from("three")).unwrap();

        let rows = store.list_blocked().unwrap();
        let addresses: Vec<&str> = rows.iter().map(|b| b.address.as_str()).collect();
        assert_eq!(addresses, vec!["one", "two", "three"]);
    }

    #[test]
    fn get_blocked_round_trips() {
        let store = MemoryStore::new();
        store.insert_blocked(&Address::from("0xbad")).unwrap();
        let row = store.get_blocked(&Address::from("0xbad")).unwrap().unwrap();
        assert_eq!(row.address, Address::from("0xbad"));
        assert!(store.get_blocked(&Address::from("0xgood")).unwrap().is_none());
    }
}
