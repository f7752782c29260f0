use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{common::generate_timestamp, ingredient_analysis::entities::Verdict};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisSource {
    Ai,
    Fallback,
}

impl AnalysisSource {
    pub fn as_str(&self) -> &str {
        match self {
            AnalysisSource::Ai => "ai",
            AnalysisSource::Fallback => "fallback",
        }
    }
}

impl From<&str> for AnalysisSource {
    fn from(s: &str) -> Self {
        match s {
            "ai" => AnalysisSource::Ai,
            _ => AnalysisSource::Fallback,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScanHistoryRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub ingredients: String,
    pub verdict: Verdict,
    pub detected: Vec<String>,
    pub is_problematic: bool,
    pub source: AnalysisSource,
    pub created_at: DateTime<Utc>,
}

impl ScanHistoryRecord {
    pub fn new(user_id: Uuid, ingredients: String, verdict: Verdict, source: AnalysisSource) -> Self {
        let (now, timestamp) = generate_timestamp();

        Self {
            id: Uuid::new_v7(timestamp),
            user_id,
            ingredients,
            detected: verdict.detected_allergens.clone(),
            is_problematic: verdict.is_problematic(),
            verdict,
            source,
            created_at: now,
        }
    }
}
