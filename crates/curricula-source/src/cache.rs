use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::OnceCell;

use curricula_core::RawTable;

use crate::adapter::ReferenceSource;
use crate::errors::Result;

/// Read-through cache of provider ranges, keyed by range name.
///
/// Owned by whoever builds the loader; there is no process-wide instance.
#[async_trait]
pub trait RangeCache: Send + Sync {
    /// Return the cached table for `range`, fetching it from `source` on a miss.
    async fn get_or_fetch(
        &self,
        range: &str,
        source: &dyn ReferenceSource,
    ) -> Result<Arc<RawTable>>;

    /// Drop the cached table for `range`; the next read refetches.
    fn invalidate(&self, range: &str);

    /// Drop every cached table.
    fn clear(&self);
}

/// Memoizes each range for the lifetime of the cache.
///
/// Concurrent misses on one key share a single fetch. A failed fetch drops
/// its empty slot so the next caller retries.
#[derive(Debug, Default)]
pub struct MemoryRangeCache {
    slots: Mutex<HashMap<String, Arc<OnceCell<Arc<RawTable>>>>>,
}

impl MemoryRangeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ranges currently holding a fetched table.
    pub fn cached_ranges(&self) -> Vec<String> {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        let mut ranges: Vec<String> = slots
            .iter()
            .filter(|(_, slot)| slot.initialized())
            .map(|(range, _)| range.clone())
            .collect();
        ranges.sort();
        ranges
    }

    fn slot(&self, range: &str) -> Arc<OnceCell<Arc<RawTable>>> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(slots.entry(range.to_string()).or_default())
    }

    /// Drop `slot` if it is still the entry for `range` and never filled, so
    /// failed lookups of arbitrary range names do not accumulate.
    fn discard_cold(&self, range: &str, slot: &Arc<OnceCell<Arc<RawTable>>>) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        let is_same_cold_slot = slots
            .get(range)
            .is_some_and(|current| Arc::ptr_eq(current, slot) && !current.initialized());
        if is_same_cold_slot {
            slots.remove(range);
        }
    }

    #[cfg(test)]
    fn slot_count(&self) -> usize {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[async_trait]
impl RangeCache for MemoryRangeCache {
    async fn get_or_fetch(
        &self,
        range: &str,
        source: &dyn ReferenceSource,
    ) -> Result<Arc<RawTable>> {
        let slot = self.slot(range);
        if let Some(table) = slot.get() {
            tracing::debug!(event = "range_cache_hit", range = %range);
            return Ok(Arc::clone(table));
        }

        let fetched = slot
            .get_or_try_init(|| async {
                tracing::debug!(event = "range_cache_miss", range = %range, source = source.kind());
                source.fetch(range).await.map(Arc::new)
            })
            .await;
        match fetched {
            Ok(table) => Ok(Arc::clone(table)),
            Err(err) => {
                self.discard_cold(range, &slot);
                Err(err)
            }
        }
    }

    fn invalidate(&self, range: &str) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        if slots.remove(range).is_some() {
            tracing::debug!(event = "range_cache_invalidated", range = %range);
        }
    }

    fn clear(&self) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.clear();
    }
}

/// Cache that never stores anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCache;

#[async_trait]
impl RangeCache for NoCache {
    async fn get_or_fetch(
        &self,
        range: &str,
        source: &dyn ReferenceSource,
    ) -> Result<Arc<RawTable>> {
        source.fetch(range).await.map(Arc::new)
    }

    fn invalidate(&self, _range: &str) {}

    fn clear(&self) {}
}
