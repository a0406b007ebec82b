use std::path::{Path, PathBuf};

use async_trait::async_trait;

use curricula_core::RawTable;

use crate::adapter::ReferenceSource;
use crate::errors::{Result, SourceError};

/// Reads each range from `<dir>/<stem>.csv`.
///
/// The file stem is derived from the range name: the sheet part before `!`,
/// lower-cased, with every run of non-alphanumeric characters replaced by a
/// single underscore (`Pre requisites!A:C` → `pre_requisites.csv`).
#[derive(Debug, Clone)]
pub struct CsvDirectorySource {
    dir: PathBuf,
}

impl CsvDirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `range`.
    pub fn path_for(&self, range: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", range_file_stem(range)))
    }
}

#[async_trait]
impl ReferenceSource for CsvDirectorySource {
    fn kind(&self) -> &'static str {
        "csv"
    }

    async fn fetch(&self, range: &str) -> Result<RawTable> {
        let path = self.path_for(range);
        if !path.exists() {
            return Err(SourceError::RangeNotFound(format!(
                "{range} (expected {})",
                path.display()
            )));
        }

        let table = tokio::task::spawn_blocking(move || read_csv(&path))
            .await
            .map_err(|err| SourceError::Provider(format!("csv reader task failed: {err}")))??;

        tracing::debug!(
            event = "range_fetched",
            source = self.kind(),
            range = %range,
            rows = table.rows.len(),
        );
        Ok(table)
    }
}

fn read_csv(path: &Path) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut rows: Vec<Vec<String>> = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(|cell| cell.to_string()).collect());
    }

    Ok(RawTable::from_rows(rows))
}

/// File stem for a provider range name.
pub fn range_file_stem(range: &str) -> String {
    let sheet = range.split('!').next().unwrap_or(range);
    let mut stem = String::with_capacity(sheet.len());
    for ch in sheet.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            stem.push(ch.to_ascii_lowercase());
        } else if !stem.ends_with('_') {
            stem.push('_');
        }
    }
    stem.trim_matches('_').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_names_map_to_file_stems() {
        assert_eq!(range_file_stem("Courses!A:H"), "courses");
        assert_eq!(range_file_stem("Pre requisites!A:C"), "pre_requisites");
        assert_eq!(range_file_stem("term template!A:E"), "term_template");
        assert_eq!(range_file_stem("minors"), "minors");
    }
}
