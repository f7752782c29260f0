use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ingredient_analysis::entities::AnalysisSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum QuickCheckStatus {
    Safe,
    Unsafe,
    Uncertain,
}

/// Answer for a single ingredient checked against the allergy profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuickCheckResult {
    pub ingredient: String,
    pub safe: bool,
    pub status: QuickCheckStatus,
    pub reason: String,
    pub source: AnalysisSource,
}

impl QuickCheckResult {
    pub fn new(
        ingredient: String,
        status: QuickCheckStatus,
        reason: String,
        source: AnalysisSource,
    ) -> Self {
        Self {
            ingredient,
            safe: status == QuickCheckStatus::Safe,
            status,
            reason,
            source,
        }
    }
}
