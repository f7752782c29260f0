use std::collections::HashSet;

use serde::Deserialize;
use tracing::warn;

use crate::domain::{
    common::entities::app_errors::CoreError,
    ingredient_analysis::entities::{
        AllergenWarning, CrossContaminationRisk, IngredientBreakdown, QuickCheckStatus,
        RiskLevel, SafetyRating, Verdict,
    },
};

/// Shape of the model reply. Serde rejects missing or mistyped fields.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VerdictReply {
    detected_allergens: Vec<String>,
    risk_level: Option<RiskLevel>,
    safety_rating: Option<SafetyRating>,
    analysis: Option<String>,
    summary: Option<String>,
    recommendations: String,
    ingredient_breakdown: IngredientBreakdown,
    #[serde(default)]
    warnings: Vec<AllergenWarning>,
    #[serde(default)]
    cross_contamination_risk: CrossContaminationRisk,
}

fn invalid(reason: impl Into<String>) -> CoreError {
    let reason = reason.into();
    warn!("Rejected LLM reply: {}", reason);
    CoreError::ExternalServiceError(format!("Invalid LLM reply: {}", reason))
}

/// Parse and validate a raw model reply into a [`Verdict`].
///
/// Any deviation from the expected contract is an upstream failure; nothing is
/// repaired or retried here.
pub fn parse_verdict_reply(raw: &str) -> Result<Verdict, CoreError> {
    let reply: VerdictReply = serde_json::from_str(raw).map_err(|e| invalid(e.to_string()))?;

    let risk_level = match (reply.risk_level, reply.safety_rating) {
        (Some(level), Some(rating)) if rating.risk_level() != level => {
            return Err(invalid(format!(
                "riskLevel {} contradicts safetyRating",
                level.as_str()
            )));
        }
        (Some(level), _) => level,
        (None, Some(rating)) => rating.risk_level(),
        (None, None) => return Err(invalid("neither riskLevel nor safetyRating present")),
    };

    if risk_level == RiskLevel::Unknown {
        return Err(invalid("risk level is unknown"));
    }

    let analysis = non_blank(reply.analysis)
        .or(non_blank(reply.summary))
        .ok_or_else(|| invalid("missing analysis text"))?;

    let mut detected: Vec<String> = Vec::new();
    for name in reply.detected_allergens {
        let name = name.trim().to_lowercase();
        if !name.is_empty() && !detected.contains(&name) {
            detected.push(name);
        }
    }

    match (risk_level, detected.is_empty()) {
        (RiskLevel::Low, false) => return Err(invalid("LOW risk with detected allergens")),
        (RiskLevel::Medium | RiskLevel::High, true) => {
            return Err(invalid("elevated risk without detected allergens"));
        }
        _ => {}
    }

    if let Some(ingredient) = overlapping_ingredient(&reply.ingredient_breakdown) {
        return Err(invalid(format!(
            "{ingredient} listed in more than one breakdown bucket"
        )));
    }

    let warnings = reply
        .warnings
        .into_iter()
        .map(|warning| AllergenWarning {
            allergen: warning.allergen.trim().to_lowercase(),
            ..warning
        })
        .collect();

    Ok(Verdict::new(
        risk_level,
        detected,
        analysis,
        reply.recommendations,
        reply.ingredient_breakdown,
        warnings,
        reply.cross_contamination_risk,
    ))
}

fn non_blank(text: Option<String>) -> Option<String> {
    text.filter(|text| !text.trim().is_empty())
}

fn overlapping_ingredient(breakdown: &IngredientBreakdown) -> Option<String> {
    let mut seen = HashSet::new();
    breakdown
        .safe
        .iter()
        .chain(&breakdown.concerning)
        .chain(&breakdown.dangerous)
        .map(|ingredient| ingredient.trim().to_lowercase())
        .find(|ingredient| !seen.insert(ingredient.clone()))
}

#[derive(Debug, Deserialize)]
struct QuickCheckReply {
    status: QuickCheckStatus,
    reason: String,
}

/// Parse a single-ingredient reply of the form `{"status": "SAFE", "reason": "..."}`.
pub fn parse_quick_check_reply(raw: &str) -> Result<(QuickCheckStatus, String), CoreError> {
    let reply: QuickCheckReply =
        serde_json::from_str(raw).map_err(|e| invalid(e.to_string()))?;

    let reason = non_blank(Some(reply.reason))
        .map(|reason| reason.trim().to_string())
        .ok_or_else(|| invalid("missing reason"))?;

    Ok((reply.status, reason))
}
