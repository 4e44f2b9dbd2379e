use proptest::prelude::*;

use callscope_scan::{RawTransaction, Reconciler, ScanClient};
use callscope_store::{CallFilter, CallStore};
use callscope_store_memory::MemoryStore;
use std::sync::Arc;

fn record_strategy() -> impl Strategy<Value = RawTransaction> {
    (
        "0x[a-f]{1,4}",
        "0x[a-f]{1,4}",
        prop::option::of(prop_oneof![
            (0u64..2_000_000_000u64).prop_map(|s| s.to_string()),
            Just(String::new()),
            Just("garbled".to_owned()),
        ]),
        prop::option::of("[a-z]{0,8}"),
    )
        .prop_map(|(from, to, time_stamp, function_name)| RawTransaction {
            from,
            to,
            time_stamp,
            function_name,
        })
}

fn batch_strategy() -> impl Strategy<Value = Vec<RawTransaction>> {
    prop::collection::vec(record_strategy(), 0..24)
}

fn reconciler() -> (Arc<MemoryStore>, Reconciler<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    (store.clone(), Reconciler::new(store, ScanClient::new("")))
}

proptest! {
    /// Merging the same batch twice never changes the row count: every
    /// timestamped record resolves as a duplicate on the second pass.
    #[test]
    fn merge_is_idempotent(records in batch_strategy()) {
        let (store, reconciler) = reconciler();

        let first = reconciler.merge(&records).unwrap();
        let rows_after_first = store.count_calls().unwrap();

        let second = reconciler.merge(&records).unwrap();
        prop_assert_eq!(store.count_calls().unwrap(), rows_after_first);
        prop_assert_eq!(second.merged, 0);
        prop_assert_eq!(second.duplicates, first.merged + first.duplicates);
        prop_assert_eq!(second.malformed, first.malformed);
    }

    /// Every fetched record lands in exactly one summary bucket.
    #[test]
    fn summary_counts_partition_the_batch(records in batch_strategy()) {
        let (_, reconciler) = reconciler();
        let summary = reconciler.merge(&records).unwrap();
        prop_assert_eq!(summary.fetched, records.len());
        prop_assert_eq!(
            summary.merged + summary.duplicates + summary.malformed,
            summary.fetched
        );
    }

    /// Provider timestamps are proof of finality: every merged row is
    /// confirmed exactly at its call time.
    #[test]
    fn merged_rows_confirm_at_call_time(records in batch_strategy()) {
        let (store, reconciler) = reconciler();
        reconciler.merge(&records).unwrap();

        let rows = store.find_calls(&CallFilter::All, None).unwrap();
        for row in rows {
            prop_assert_eq!(row.confirmed_at, Some(row.call_time));
        }
    }
}
