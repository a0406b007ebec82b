use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use curricula_core::RawTable;

use crate::adapter::ReferenceSource;
use crate::errors::{Result, SourceError};

/// In-memory provider for tests and embedding.
///
/// Counts fetches so callers can observe cache behavior.
#[derive(Debug, Default)]
pub struct MemorySource {
    tables: HashMap<String, RawTable>,
    delay: Option<Duration>,
    fetches: AtomicUsize,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the table served for `range`.
    pub fn with_table(mut self, range: impl Into<String>, table: RawTable) -> Self {
        self.tables.insert(range.into(), table);
        self
    }

    /// Sleep before answering each fetch.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of fetches answered so far, failed ones included.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReferenceSource for MemorySource {
    fn kind(&self) -> &'static str {
        "memory"
    }

    async fn fetch(&self, range: &str) -> Result<RawTable> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.tables
            .get(range)
            .cloned()
            .ok_or_else(|| SourceError::RangeNotFound(range.to_string()))
    }
}
