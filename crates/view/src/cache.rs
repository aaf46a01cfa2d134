//! Explicit, passed-around caches.
//!
//! - [`ViewMemo`] memoizes one composed view per list, keyed on the identity
//!   of the fetched collection and the filter-state value.
//! - [`QueryCache`] holds fetched collections keyed by [`QueryKey`] and is
//!   invalidated by key prefix after mutations.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Duration, Utc};
use tracing::trace;

use crate::compose::{DerivedView, compose};
use crate::field::Record;
use crate::state::FilterState;

// ─────────────────────────────────────────────────────────────────────────────
// View memo
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoStats {
    pub hits: u64,
    pub misses: u64,
}

#[derive(Debug)]
struct MemoSlot<R> {
    // Holding the Arc keeps its allocation alive, so the pointer cannot be
    // reused by a different collection while the slot exists.
    collection: Arc<Vec<R>>,
    state: FilterState,
    view: Arc<DerivedView<R>>,
}

/// Single-slot memo for [`compose`].
///
/// Serves the cached view only when the collection is the *same* allocation
/// and the filter state is equal; any change recomputes.
#[derive(Debug)]
pub struct ViewMemo<R> {
    slot: Option<MemoSlot<R>>,
    stats: MemoStats,
}

impl<R> Default for ViewMemo<R> {
    fn default() -> Self {
        Self {
            slot: None,
            stats: MemoStats::default(),
        }
    }
}

impl<R: Record> ViewMemo<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&mut self, collection: &Arc<Vec<R>>, state: &FilterState) -> Arc<DerivedView<R>> {
        if let Some(slot) = &self.slot {
            if Arc::ptr_eq(&slot.collection, collection) && slot.state == *state {
                self.stats.hits += 1;
                trace!("view memo hit");
                return Arc::clone(&slot.view);
            }
        }

        self.stats.misses += 1;
        trace!("view memo miss");
        let view = Arc::new(compose(collection, state));
        self.slot = Some(MemoSlot {
            collection: Arc::clone(collection),
            state: state.clone(),
            view: Arc::clone(&view),
        });
        view
    }

    pub fn invalidate(&mut self) {
        self.slot = None;
    }

    pub fn stats(&self) -> MemoStats {
        self.stats
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Query cache
// ─────────────────────────────────────────────────────────────────────────────

/// Hierarchical cache key, e.g. `admin/users/page=1/size=20`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Segment-wise prefix test (`admin/user` is not a prefix of `admin/users`).
    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl core::fmt::Display for QueryKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CachedEntry<V> {
    pub value: V,
    pub cached_at: DateTime<Utc>,
}

/// Key/value cache for fetched query results.
#[derive(Debug)]
pub struct QueryCache<V> {
    inner: RwLock<HashMap<QueryKey, CachedEntry<V>>>,
}

impl<V> Default for QueryCache<V> {
    fn default() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

impl<V: Clone> QueryCache<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, key: QueryKey, value: V) {
        self.insert_at(key, value, Utc::now());
    }

    pub fn insert_at(&self, key: QueryKey, value: V, cached_at: DateTime<Utc>) {
        if let Ok(mut map) = self.inner.write() {
            map.insert(key, CachedEntry { value, cached_at });
        }
    }

    pub fn get(&self, key: &QueryKey) -> Option<CachedEntry<V>> {
        let map = self.inner.read().ok()?;
        map.get(key).cloned()
    }

    /// Like [`get`](Self::get), but `None` once the entry is older than
    /// `max_age` at `now`.
    pub fn get_fresh(&self, key: &QueryKey, max_age: Duration, now: DateTime<Utc>) -> Option<V> {
        let entry = self.get(key)?;
        if now.signed_duration_since(entry.cached_at) > max_age {
            trace!(key = %key, "query cache entry stale");
            return None;
        }
        Some(entry.value)
    }

    /// Remove every entry under `prefix`; returns how many were removed.
    pub fn invalidate(&self, prefix: &QueryKey) -> usize {
        let Ok(mut map) = self.inner.write() else {
            return 0;
        };
        let before = map.len();
        map.retain(|key, _| !key.starts_with(prefix));
        let removed = before - map.len();
        trace!(prefix = %prefix, removed, "query cache invalidated");
        removed
    }

    pub fn invalidate_all(&self) {
        if let Ok(mut map) = self.inner.write() {
            map.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|map| map.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
