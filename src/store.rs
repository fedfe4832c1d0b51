//! Latest ticker snapshot per symbol.
//!
//! [`TickerStore`] is a cheap-to-clone handle over an [`ArcSwap`] of the
//! whole symbol map. A `put` copies the map, replaces one entry and swaps
//! the new map in; a `get` is a lock-free load. Readers therefore hold
//! either the previous snapshot or the new one, never a mix, and never
//! wait on a writer.

use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::models::{TickerSnapshot, normalize_symbol};

type SnapshotMap = HashMap<String, Arc<TickerSnapshot>>;

/// Shared map of symbol to latest [`TickerSnapshot`].
#[derive(Debug, Clone, Default)]
pub struct TickerStore {
    inner: Arc<ArcSwap<SnapshotMap>>,
}

impl TickerStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the snapshot for `snapshot.symbol`.
    pub fn put(&self, snapshot: TickerSnapshot) {
        let key = normalize_symbol(&snapshot.symbol);
        let snapshot = Arc::new(snapshot);
        self.inner.rcu(|current| {
            let mut next = SnapshotMap::clone(current);
            next.insert(key.clone(), Arc::clone(&snapshot));
            next
        });
    }

    /// Returns the last committed snapshot for `symbol`, if any.
    ///
    /// `symbol` may be given in configured form (`BTC-USDT`).
    #[must_use]
    pub fn get(&self, symbol: &str) -> Option<Arc<TickerSnapshot>> {
        self.inner.load().get(&normalize_symbol(symbol)).cloned()
    }

    /// Number of symbols with data.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.load().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
