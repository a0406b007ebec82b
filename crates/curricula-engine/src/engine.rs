use curricula_core::Catalog;

use crate::credits::aggregate_credits;
use crate::errors::Result;
use crate::model::{EngineOptions, ValidationReport, ValidationRequest};
use crate::prereqs::{unmet_prerequisites, valid_selected};
use crate::requirements::{code_set, fulfilled_minors, fulfilled_tracks};
use crate::selection::{RawSelection, Selection};

/// Validate selections against an immutable catalog.
///
/// The engine holds no state between runs; one instance may be shared across
/// threads and concurrent evaluations.
#[derive(Debug, Clone, Default)]
pub struct ValidationEngine {
    options: EngineOptions,
}

impl ValidationEngine {
    pub fn new(options: EngineOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Run every rule over a normalized selection.
    pub fn run(&self, catalog: &Catalog, selection: &Selection) -> ValidationReport {
        let unmet = unmet_prerequisites(catalog, selection);
        let valid = valid_selected(catalog, selection);

        let valid_set = code_set(&valid);
        let fulfilled_tracks = fulfilled_tracks(catalog, &valid_set);
        let fulfilled_minors = fulfilled_minors(catalog, selection, &valid_set);
        let credit_status = aggregate_credits(catalog, &valid).status(&self.options.thresholds);

        let warnings = if self.options.include_warnings {
            catalog.warnings().to_vec()
        } else {
            Vec::new()
        };

        tracing::info!(
            event = "validation_finished",
            selected = selection.all_selected().len(),
            valid = valid.len(),
            unmet = unmet.len(),
            tracks = fulfilled_tracks.len(),
            minors = fulfilled_minors.len(),
            ordered = selection.is_ordered(),
        );

        ValidationReport {
            unmet,
            valid_selected: valid,
            fulfilled_tracks,
            fulfilled_minors,
            credit_status,
            warnings,
        }
    }

    /// Normalize a boundary payload, then run.
    pub fn run_raw(&self, catalog: &Catalog, raw: &RawSelection) -> ValidationReport {
        self.run(catalog, &Selection::from_raw(raw))
    }

    /// Parse a `{ "selection": ... }` JSON body, then run.
    pub fn run_request(&self, catalog: &Catalog, body: &str) -> Result<ValidationReport> {
        let request: ValidationRequest = serde_json::from_str(body)?;
        Ok(self.run_raw(catalog, &request.selection))
    }
}

/// Validate a JSON request body with default options.
pub fn validate_request(catalog: &Catalog, body: &str) -> Result<ValidationReport> {
    ValidationEngine::default().run_request(catalog, body)
}
