use std::borrow::Cow;

use allersafe_core::domain::{
    allergy_profile::{entities::Severity, value_objects::ExplicitAllergen},
    ingredient_analysis::value_objects::{AnalyzeIngredientsInput, QuickCheckInput},
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

/// An allergy given either as a bare name or as a `{type, severity}` object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum AllergyEntry {
    Name(String),
    Detailed {
        #[serde(rename = "type")]
        name: String,
        #[serde(default)]
        severity: Option<String>,
    },
}

impl From<AllergyEntry> for ExplicitAllergen {
    fn from(entry: AllergyEntry) -> Self {
        match entry {
            AllergyEntry::Name(name) => ExplicitAllergen::new(name, None),
            AllergyEntry::Detailed { name, severity } => ExplicitAllergen::new(
                name,
                severity.and_then(|raw| raw.parse::<Severity>().ok()),
            ),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
pub struct AnalyzeIngredientsRequest {
    #[validate(
        length(max = 10000, message = "ingredients must be at most 10000 characters"),
        custom(function = "validate_not_blank")
    )]
    #[schema(example = "Water, Wheat Flour, Sugar, Peanut Oil, Salt")]
    pub ingredients: String,
    /// Omitted or empty: the caller's family profiles are used.
    #[serde(default, alias = "familyAllergies")]
    pub allergies: Option<Vec<AllergyEntry>>,
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank")
            .with_message(Cow::Borrowed("Ingredients text is required")));
    }
    Ok(())
}

fn validate_ingredient_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(
            ValidationError::new("blank").with_message(Cow::Borrowed("Ingredient is required"))
        );
    }
    Ok(())
}

fn explicit_allergens(entries: Option<Vec<AllergyEntry>>) -> Vec<ExplicitAllergen> {
    entries
        .unwrap_or_default()
        .into_iter()
        .map(ExplicitAllergen::from)
        .collect()
}

impl From<AnalyzeIngredientsRequest> for AnalyzeIngredientsInput {
    fn from(request: AnalyzeIngredientsRequest) -> Self {
        AnalyzeIngredientsInput {
            ingredients: request.ingredients,
            allergies: explicit_allergens(request.allergies),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
pub struct QuickCheckRequest {
    #[validate(
        length(max = 200, message = "ingredient must be at most 200 characters"),
        custom(function = "validate_ingredient_not_blank")
    )]
    #[schema(example = "tahini")]
    pub ingredient: String,
    /// Omitted or empty: the caller's family profiles are used.
    #[serde(default, alias = "familyAllergies")]
    pub allergies: Option<Vec<AllergyEntry>>,
}

impl From<QuickCheckRequest> for QuickCheckInput {
    fn from(request: QuickCheckRequest) -> Self {
        QuickCheckInput {
            ingredient: request.ingredient,
            allergies: explicit_allergens(request.allergies),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct GetScanHistoryParams {
    #[schema(example = 0)]
    pub offset: Option<u32>,
    #[schema(example = 20)]
    pub limit: Option<u32>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_mixed_allergy_entries_are_accepted() {
        let request: AnalyzeIngredientsRequest = serde_json::from_value(json!({
            "ingredients": "milk, sugar",
            "familyAllergies": ["Peanut", {"type": "milk", "severity": "severe"}, {"type": "soy"}]
        }))
        .unwrap();

        let input = AnalyzeIngredientsInput::from(request);

        assert_eq!(input.allergies.len(), 3);
        assert_eq!(input.allergies[1].name, "milk");
        assert_eq!(input.allergies[1].severity, Some(Severity::Severe));
        assert_eq!(input.allergies[2].severity, None);
    }

    #[test]
    fn test_blank_ingredients_fail_validation() {
        let request = AnalyzeIngredientsRequest {
            ingredients: "   ".to_string(),
            allergies: None,
        };

        assert!(request.validate().is_err());
    }

    #[test]
    fn test_oversized_ingredients_fail_validation() {
        let request = AnalyzeIngredientsRequest {
            ingredients: "a".repeat(10001),
            allergies: None,
        };

        assert!(request.validate().is_err());
    }

    #[test]
    fn test_non_string_ingredients_are_rejected() {
        let parsed = serde_json::from_value::<AnalyzeIngredientsRequest>(json!({
            "ingredients": 42
        }));

        assert!(parsed.is_err());
    }

    #[test]
    fn test_quick_check_request() {
        let request: QuickCheckRequest = serde_json::from_value(json!({
            "ingredient": "tahini",
            "allergies": [{"type": "Sesame", "severity": "moderate"}]
        }))
        .unwrap();
        assert!(request.validate().is_ok());

        let input = QuickCheckInput::from(request);

        assert_eq!(input.ingredient, "tahini");
        assert_eq!(input.allergies[0].name, "Sesame");
        assert_eq!(input.allergies[0].severity, Some(Severity::Moderate));
    }

    #[test]
    fn test_blank_quick_check_ingredient_fails_validation() {
        let request = QuickCheckRequest {
            ingredient: " ".to_string(),
            allergies: None,
        };

        assert!(request.validate().is_err());
    }
}
