use crate::{Flag, ProviderStatus};
use arc_swap::ArcSwap;
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

pub type FlagTable = HashMap<String, Arc<Flag>>;

/// Flag table and readiness status shared between resolvers and writers.
///
/// Readers load a whole table snapshot; writers publish a whole new table.
pub struct FlagStore {
    table: ArcSwap<FlagTable>,
    status: AtomicU8,
}

impl FlagStore {
    pub fn new(flags: Vec<Flag>) -> Self {
        Self {
            table: ArcSwap::from_pointee(to_table(flags)),
            status: AtomicU8::new(ProviderStatus::NotReady as u8),
        }
    }

    pub fn status(&self) -> ProviderStatus {
        ProviderStatus::from_u8(self.status.load(Ordering::SeqCst))
    }

    /// Stores `status`, returning the previous one.
    pub fn set_status(&self, status: ProviderStatus) -> ProviderStatus {
        ProviderStatus::from_u8(self.status.swap(status as u8, Ordering::SeqCst))
    }

    /// Moves to `Ready` unless the status is `Error` or `Fatal`. Returns the
    /// previous status, or the blocking one as the error.
    pub fn mark_ready(&self) -> Result<ProviderStatus, ProviderStatus> {
        self.status
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                match ProviderStatus::from_u8(current) {
                    ProviderStatus::Error | ProviderStatus::Fatal => None,
                    _ => Some(ProviderStatus::Ready as u8),
                }
            })
            .map(ProviderStatus::from_u8)
            .map_err(ProviderStatus::from_u8)
    }

    pub fn get(&self, key: &str) -> Option<Arc<Flag>> {
        self.table.load().get(key).cloned()
    }

    pub fn snapshot(&self) -> Arc<FlagTable> {
        self.table.load_full()
    }

    /// Publishes `flags` as the new table. Returns the sorted union of the
    /// old and new keys.
    pub fn replace(&self, flags: Vec<Flag>) -> Vec<String> {
        let new_table = to_table(flags);
        let mut changed: BTreeSet<String> = new_table.keys().cloned().collect();
        let old_table = self.table.swap(Arc::new(new_table));
        changed.extend(old_table.keys().cloned());
        changed.into_iter().collect()
    }

    /// Publishes a copy of the current table with `flag` inserted or replaced.
    pub fn upsert(&self, flag: Flag) {
        let flag = Arc::new(flag);
        self.table.rcu(|current| {
            let mut next = FlagTable::clone(current);
            next.insert(flag.key().to_owned(), Arc::clone(&flag));
            next
        });
    }
}

fn to_table(flags: Vec<Flag>) -> FlagTable {
    flags
        .into_iter()
        .map(|flag| (flag.key().to_owned(), Arc::new(flag)))
        .collect()
}

#[cfg(test)]
mod store_tests {
    use super::*;

    fn flag(key: &str, value: i64) -> Flag {
        Flag::builder(key)
            .variant("v", value)
            .default_variant("v")
            .build()
            .unwrap()
    }

    #[test]
    fn replace_reports_union_of_keys() {
        let store = FlagStore::new(vec![flag("a", 1), flag("b", 1)]);
        let changed = store.replace(vec![flag("b", 2), flag("c", 2)]);

        assert_eq!(changed, vec!["a", "b", "c"]);
        assert!(store.get("a").is_none());
        assert_eq!(store.get("b").unwrap().variant("v"), Some(&crate::Value::Int(2)));
    }

    #[test]
    fn snapshot_is_unaffected_by_later_writes() {
        let store = FlagStore::new(vec![flag("a", 1)]);
        let before = store.snapshot();

        store.upsert(flag("b", 1));
        store.replace(vec![]);

        assert_eq!(before.len(), 1);
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn upsert_replaces_existing() {
        let store = FlagStore::new(vec![flag("a", 1)]);
        store.upsert(flag("a", 5));

        assert_eq!(store.snapshot().len(), 1);
        assert_eq!(store.get("a").unwrap().variant("v"), Some(&crate::Value::Int(5)));
    }

    #[test]
    fn status_transitions() {
        let store = FlagStore::new(vec![]);
        assert_eq!(store.status(), ProviderStatus::NotReady);
        assert_eq!(store.set_status(ProviderStatus::Ready), ProviderStatus::NotReady);
        assert_eq!(store.status(), ProviderStatus::Ready);
    }

    #[test]
    fn mark_ready_refuses_error_states() {
        let store = FlagStore::new(vec![]);
        assert_eq!(store.mark_ready(), Ok(ProviderStatus::NotReady));
        assert_eq!(store.mark_ready(), Ok(ProviderStatus::Ready));

        for blocking in [ProviderStatus::Error, ProviderStatus::Fatal] {
            store.set_status(blocking);
            assert_eq!(store.mark_ready(), Err(blocking));
            assert_eq!(store.status(), blocking);
        }

        store.set_status(ProviderStatus::Stale);
        assert_eq!(store.mark_ready(), Ok(ProviderStatus::Stale));
    }

    #[test]
    fn mark_ready_never_overrides_concurrent_error() {
        for _ in 0..200 {
            let store = FlagStore::new(vec![]);
            std::thread::scope(|s| {
                s.spawn(|| {
                    let _ = store.mark_ready();
                });
                s.spawn(|| {
                    store.set_status(ProviderStatus::Error);
                });
            });
            // Error was set last, or mark_ready saw it and backed off.
            assert_eq!(store.status(), ProviderStatus::Error);
        }
    }

    #[test]
    fn snapshots_hold_a_single_generation() {
        fn generation(gen: i64) -> Vec<Flag> {
            (0..8).map(|i| flag(&format!("flag-{i}"), gen)).collect()
        }

        let store = FlagStore::new(generation(0));
        std::thread::scope(|s| {
            s.spawn(|| {
                for gen in 1..=500 {
                    store.replace(generation(gen));
                }
            });
            for _ in 0..4 {
                s.spawn(|| {
                    let mut last = 0;
                    for _ in 0..2000 {
                        let table = store.snapshot();
                        assert_eq!(table.len(), 8);
                        let gens: BTreeSet<i64> = table
                            .values()
                            .filter_map(|f| f.variant("v").and_then(|v| v.as_int()))
                            .collect();
                        assert_eq!(gens.len(), 1, "mixed generations {gens:?}");
                        let gen = *gens.iter().next().unwrap();
                        assert!(gen >= last);
                        last = gen;
                    }
                });
            }
        });
        assert_eq!(store.get("flag-7").unwrap().variant("v"), Some(&crate::Value::Int(500)));
    }
}
