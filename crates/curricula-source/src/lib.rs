//! Reference data providers, the range cache, and the catalog loader.

pub mod adapter;
pub mod cache;
pub mod csv_dir;
pub mod errors;
pub mod loader;
pub mod memory;
pub mod options;

pub use adapter::ReferenceSource;
pub use cache::{MemoryRangeCache, NoCache, RangeCache};
pub use csv_dir::{CsvDirectorySource, range_file_stem};
pub use errors::{Result, SourceError};
pub use loader::CatalogLoader;
pub use memory::MemorySource;
pub use options::RangeNames;

pub use curricula_core::Catalog;
