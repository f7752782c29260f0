use tracing::warn;

use crate::{
    domain::ingredient_analysis::entities::{ScanHistoryRecord, Verdict},
    entity::scan_history,
};

impl From<&scan_history::Model> for ScanHistoryRecord {
    fn from(model: &scan_history::Model) -> Self {
        let verdict: Verdict = serde_json::from_value(model.analysis.clone()).unwrap_or_else(|e| {
            warn!(scan_id = %model.id, "Stored verdict is unreadable: {}", e);
            Verdict::unknown("Stored analysis could not be read")
        });
        let detected: Vec<String> =
            serde_json::from_value(model.detected.clone()).unwrap_or_default();

        Self {
            id: model.id,
            user_id: model.user_id,
            ingredients: model.ingredients.clone(),
            verdict,
            detected,
            is_problematic: model.is_problematic,
            source: model.analysis_source.as_str().into(),
            created_at: model.created_at.to_utc(),
        }
    }
}

impl From<scan_history::Model> for ScanHistoryRecord {
    fn from(model: scan_history::Model) -> Self {
        Self::from(&model)
    }
}
