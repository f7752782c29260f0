use serde_json::json;

/// Returns the JSON schema expected from the LLM for an ingredient analysis
pub fn get_ingredient_analysis_schema() -> serde_json::Value {
    let string_list = json!({ "type": "array", "items": { "type": "string" } });

    json!({
        "type": "object",
        "properties": {
            "detectedAllergens": string_list,
            "riskLevel": {
                "type": "string",
                "enum": ["LOW", "MEDIUM", "HIGH"]
            },
            "analysis": { "type": "string" },
            "recommendations": { "type": "string" },
            "ingredientBreakdown": {
                "type": "object",
                "properties": {
                    "safe": string_list,
                    "concerning": string_list,
                    "dangerous": string_list
                },
                "required": ["safe", "concerning", "dangerous"]
            },
            "warnings": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "allergen": { "type": "string" },
                        "severity": {
                            "type": "string",
                            "enum": ["mild", "moderate", "severe"]
                        },
                        "ingredient": { "type": "string" },
                        "reason": { "type": "string" }
                    },
                    "required": ["allergen", "ingredient", "reason"]
                }
            },
            "crossContaminationRisk": {
                "type": "string",
                "enum": ["low", "medium", "high", "unknown"]
            }
        },
        "required": [
            "detectedAllergens", "riskLevel", "analysis",
            "recommendations", "ingredientBreakdown"
        ]
    })
}
