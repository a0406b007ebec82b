use std::sync::Arc;
use std::time::Instant;

use curricula_core::{Catalog, TermTemplate};

use crate::adapter::ReferenceSource;
use crate::cache::RangeCache;
use crate::errors::{Result, SourceError};
use crate::options::RangeNames;

/// Loads the reference catalog through an injected cache.
#[derive(Clone)]
pub struct CatalogLoader {
    source: Arc<dyn ReferenceSource>,
    cache: Arc<dyn RangeCache>,
    ranges: RangeNames,
}

impl CatalogLoader {
    pub fn new(
        source: Arc<dyn ReferenceSource>,
        cache: Arc<dyn RangeCache>,
        ranges: RangeNames,
    ) -> Self {
        Self {
            source,
            cache,
            ranges,
        }
    }

    pub fn ranges(&self) -> &RangeNames {
        &self.ranges
    }

    /// Fetch the four ranges (cached where possible) and map them into a
    /// [`Catalog`].
    ///
    /// Any fetch failure fails the whole load; row-level problems end up in
    /// [`Catalog::warnings`].
    pub async fn load(&self) -> Result<Catalog> {
        let started = Instant::now();
        let source = self.source.as_ref();

        let (courses, prerequisites, tracks, minors) = tokio::try_join!(
            self.cache.get_or_fetch(&self.ranges.courses, source),
            self.cache.get_or_fetch(&self.ranges.prerequisites, source),
            self.cache.get_or_fetch(&self.ranges.tracks, source),
            self.cache.get_or_fetch(&self.ranges.minors, source),
        )?;

        let catalog = Catalog::from_tables(&courses, &prerequisites, &tracks, &minors);

        tracing::info!(
            event = "catalog_loaded",
            source = source.kind(),
            courses = catalog.courses().len(),
            prerequisites = catalog.prerequisites().len(),
            tracks = catalog.tracks().len(),
            minors = catalog.minors().len(),
            warnings = catalog.warnings().len(),
            duration_ms = started.elapsed().as_millis() as u64,
        );
        for warning in catalog.warnings() {
            tracing::warn!(
                event = "catalog_warning",
                code = %warning.code,
                range = %warning.range,
                row = ?warning.row,
                message = %warning.message,
            );
        }

        Ok(catalog)
    }

    /// Fetch the term template range through the cache.
    ///
    /// The range is optional: `Ok(None)` when the provider does not have it.
    /// Other fetch errors propagate.
    pub async fn load_term_template(&self) -> Result<Option<TermTemplate>> {
        let range = self.ranges.term_template.as_str();
        let table = match self.cache.get_or_fetch(range, self.source.as_ref()).await {
            Ok(table) => table,
            Err(SourceError::RangeNotFound(_)) => {
                tracing::debug!(event = "term_template_missing", range = %range);
                return Ok(None);
            }
            Err(err) => return Err(err),
        };

        let template = TermTemplate::from_table(&table);
        tracing::info!(
            event = "term_template_loaded",
            source = self.source.kind(),
            rows = template.rows().len(),
        );
        Ok(Some(template))
    }

    /// Drop the cached ranges of this loader so the next load refetches.
    pub fn invalidate(&self) {
        for range in self.ranges.all() {
            self.cache.invalidate(range);
        }
    }

    /// Invalidate and load again.
    pub async fn reload(&self) -> Result<Catalog> {
        self.invalidate();
        self.load().await
    }
}
