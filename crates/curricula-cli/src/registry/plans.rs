use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use super::{PlanStore, SavedPlan, StoreError, StoreResult};
use crate::workspace::write_bytes_atomic;

/// Stores each saved plan as one JSON file under `<root>/<student_id>/`.
#[derive(Debug, Clone)]
pub struct JsonPlanStore {
    root: PathBuf,
}

impl JsonPlanStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn student_dir(&self, student_id: &str) -> StoreResult<PathBuf> {
        let id = student_id.trim();
        let valid = !id.is_empty()
            && id != "."
            && id != ".."
            && id
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.' | '@'));
        if !valid {
            return Err(StoreError::InvalidStudentId(student_id.to_string()));
        }
        Ok(self.root.join(id))
    }
}

impl PlanStore for JsonPlanStore {
    fn save(&self, student_id: &str, selection: Value, results: Value) -> StoreResult<SavedPlan> {
        let dir = self.student_dir(student_id)?;
        let plan = SavedPlan {
            id: Uuid::new_v4().to_string(),
            student_id: student_id.trim().to_string(),
            saved_at: Utc::now(),
            selection,
            results,
        };

        let stamp = plan.saved_at.format("%Y%m%dT%H%M%S%.9fZ");
        let path = dir.join(format!("{stamp}__{}.json", plan.id));
        let data = serde_json::to_vec_pretty(&plan)?;
        write_bytes_atomic(&path, &data)?;

        tracing::info!(
            event = "plan_saved",
            student_id = %plan.student_id,
            plan_id = %plan.id,
            path = %path.display(),
        );
        Ok(plan)
    }

    fn list(&self, student_id: &str) -> StoreResult<Vec<SavedPlan>> {
        let dir = self.student_dir(student_id)?;
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut plans = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if !is_plan_file(&path) {
                continue;
            }
            match read_plan(&path) {
                Ok(plan) => plans.push(plan),
                Err(err) => {
                    tracing::warn!(
                        event = "plan_unreadable",
                        path = %path.display(),
                        error = %err,
                    );
                }
            }
        }

        plans.sort_by(|a, b| b.saved_at.cmp(&a.saved_at).then_with(|| b.id.cmp(&a.id)));
        Ok(plans)
    }
}

fn is_plan_file(path: &Path) -> bool {
    let hidden = path
        .file_name()
        .is_some_and(|name| name.to_string_lossy().starts_with('.'));
    !hidden && path.extension().is_some_and(|ext| ext == "json")
}

fn read_plan(path: &Path) -> StoreResult<SavedPlan> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
