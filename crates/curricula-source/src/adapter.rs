use async_trait::async_trait;

use curricula_core::RawTable;

use crate::errors::Result;

/// Trait implemented by providers of curriculum reference data.
///
/// A provider answers one named range (e.g. `Courses!A:H`) with a header row
/// plus data rows of string cells. Retries and timeouts belong to the
/// provider, not to the caller.
#[async_trait]
pub trait ReferenceSource: Send + Sync {
    /// Returns the provider identifier (e.g. `csv`).
    fn kind(&self) -> &'static str;

    /// Fetch a single range.
    async fn fetch(&self, range: &str) -> Result<RawTable>;
}
