//! Saved plans: validation results stored per student.

mod logging;
mod plans;

pub use logging::init_logging;
pub use plans::JsonPlanStore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors raised by a plan store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid student id: {0:?}")]
    InvalidStudentId(String),
}

/// Result type for plan store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// One saved selection and the report computed for it.
///
/// Both payloads are opaque to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedPlan {
    pub id: String,
    pub student_id: String,
    pub saved_at: DateTime<Utc>,
    pub selection: Value,
    pub results: Value,
}

/// Persistence for saved plans, keyed by student.
pub trait PlanStore: Send + Sync {
    fn save(&self, student_id: &str, selection: Value, results: Value) -> StoreResult<SavedPlan>;

    /// Every plan saved for `student_id`, newest first.
    fn list(&self, student_id: &str) -> StoreResult<Vec<SavedPlan>>;
}
