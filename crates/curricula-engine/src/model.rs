use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use curricula_core::CatalogWarning;

use crate::credits::{CreditStatus, CreditThresholds};
use crate::selection::RawSelection;

/// Options for a validation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    pub thresholds: CreditThresholds,
    /// Copy catalog parse warnings into the report.
    pub include_warnings: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            thresholds: CreditThresholds::default(),
            include_warnings: true,
        }
    }
}

/// Body accepted at the request boundary.
///
/// A missing `selection` is an empty selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ValidationRequest {
    #[serde(default)]
    pub selection: RawSelection,
}

/// Outcome of validating one selection against the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// One message per violated prerequisite edge, in catalog order.
    pub unmet: Vec<String>,
    /// Selected codes whose own prerequisites are met.
    pub valid_selected: Vec<String>,
    pub fulfilled_tracks: Vec<String>,
    pub fulfilled_minors: Vec<String>,
    pub credit_status: CreditStatus,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<CatalogWarning>,
}
