use serde::Serialize;
use uuid::Uuid;

use crate::domain::allergy_profile::value_objects::ExplicitAllergen;

#[derive(Debug, Clone)]
pub struct AnalyzeIngredientsInput {
    pub ingredients: String,
    pub allergies: Vec<ExplicitAllergen>,
}

#[derive(Debug, Clone)]
pub struct QuickCheckInput {
    pub ingredient: String,
    pub allergies: Vec<ExplicitAllergen>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// One chat completion call whose reply must be a JSON object.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanHistoryFilter {
    pub offset: u32,
    pub limit: u32,
}

impl ScanHistoryFilter {
    pub fn new(offset: Option<u32>, limit: Option<u32>) -> Self {
        Self {
            offset: offset.unwrap_or(0),
            limit: limit.unwrap_or(20).clamp(1, 100),
        }
    }
}

impl Default for ScanHistoryFilter {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[derive(Debug, Clone)]
pub struct GetScanHistoryInput {
    pub filter: ScanHistoryFilter,
}

#[derive(Debug, Clone)]
pub struct GetScanInput {
    pub scan_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_filter_defaults_and_clamps() {
        assert_eq!(ScanHistoryFilter::default(), ScanHistoryFilter { offset: 0, limit: 20 });
        assert_eq!(ScanHistoryFilter::new(Some(40), Some(0)).limit, 1);
        assert_eq!(ScanHistoryFilter::new(None, Some(500)).limit, 100);
        assert_eq!(ScanHistoryFilter::new(Some(40), None).offset, 40);
    }
}
