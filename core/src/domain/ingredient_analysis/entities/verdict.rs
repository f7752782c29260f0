use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::allergy_profile::entities::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Unknown,
}

impl RiskLevel {
    /// Banding used by the fallback matcher: 0 → LOW, 1-2 → MEDIUM, 3+ → HIGH.
    pub fn from_detection_count(count: usize) -> Self {
        match count {
            0 => RiskLevel::Low,
            1..=2 => RiskLevel::Medium,
            _ => RiskLevel::High,
        }
    }

    pub fn safety_rating(&self) -> SafetyRating {
        match self {
            RiskLevel::Low => SafetyRating::Safe,
            RiskLevel::Medium => SafetyRating::Caution,
            RiskLevel::High => SafetyRating::Danger,
            RiskLevel::Unknown => SafetyRating::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Unknown => "UNKNOWN",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SafetyRating {
    Safe,
    Caution,
    Danger,
    Unknown,
}

impl SafetyRating {
    pub fn risk_level(&self) -> RiskLevel {
        match self {
            SafetyRating::Safe => RiskLevel::Low,
            SafetyRating::Caution => RiskLevel::Medium,
            SafetyRating::Danger => RiskLevel::High,
            SafetyRating::Unknown => RiskLevel::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CrossContaminationRisk {
    Low,
    Medium,
    High,
    #[default]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct IngredientBreakdown {
    pub safe: Vec<String>,
    pub concerning: Vec<String>,
    pub dangerous: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AllergenWarning {
    pub allergen: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    pub ingredient: String,
    pub reason: String,
}

/// Outcome of one ingredient analysis, whichever engine produced it.
///
/// `safetyRating` always mirrors `riskLevel` and `summary` always mirrors `analysis`,
/// so clients written against either vocabulary read the same answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub risk_level: RiskLevel,
    pub safety_rating: SafetyRating,
    pub detected_allergens: Vec<String>,
    pub analysis: String,
    pub summary: String,
    pub recommendations: String,
    pub ingredient_breakdown: IngredientBreakdown,
    #[serde(default)]
    pub warnings: Vec<AllergenWarning>,
    #[serde(default)]
    pub cross_contamination_risk: CrossContaminationRisk,
}

impl Verdict {
    pub fn new(
        risk_level: RiskLevel,
        detected_allergens: Vec<String>,
        analysis: String,
        recommendations: String,
        ingredient_breakdown: IngredientBreakdown,
        warnings: Vec<AllergenWarning>,
        cross_contamination_risk: CrossContaminationRisk,
    ) -> Self {
        Self {
            risk_level,
            safety_rating: risk_level.safety_rating(),
            detected_allergens,
            summary: analysis.clone(),
            analysis,
            recommendations,
            ingredient_breakdown,
            warnings,
            cross_contamination_risk,
        }
    }

    /// Stub returned when no verdict could be computed at all. Never claims safety.
    pub fn unknown(summary: impl Into<String>) -> Self {
        Self::new(
            RiskLevel::Unknown,
            Vec::new(),
            summary.into(),
            "Unable to verify this product. Treat it as unsafe until you can check the label with the manufacturer.".to_string(),
            IngredientBreakdown::default(),
            Vec::new(),
            CrossContaminationRisk::Unknown,
        )
    }

    pub fn is_problematic(&self) -> bool {
        !self.detected_allergens.is_empty()
    }
}
