use crate::domain::{
    allergy_profile::value_objects::EffectiveAllergens,
    ingredient_analysis::{
        lexicon::{ALLERGEN_ALIASES, COMMON_ALLERGENS},
        schema::get_ingredient_analysis_schema,
        value_objects::{ChatMessage, CompletionRequest},
    },
};

pub const ANALYSIS_TEMPERATURE: f32 = 0.1;

const SYSTEM_PROMPT: &str = "You are an expert food allergen detector. \
You answer with a single JSON object and nothing else.";

const QUICK_CHECK_SYSTEM_PROMPT: &str = "You are an allergen detection expert. \
Provide quick, accurate assessments of ingredient safety as a single JSON object.";

pub fn build_analysis_request(
    ingredients: &str,
    allergens: &EffectiveAllergens,
) -> CompletionRequest {
    CompletionRequest {
        messages: vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(build_user_prompt(ingredients, allergens)),
        ],
        temperature: ANALYSIS_TEMPERATURE,
    }
}

/// Single ingredient yes/no question, answered as `{"status", "reason"}`.
pub fn build_quick_check_request(
    ingredient: &str,
    allergens: &EffectiveAllergens,
) -> CompletionRequest {
    let allergies = if allergens.is_empty() {
        "None specified".to_string()
    } else {
        allergens.names().collect::<Vec<_>>().join(", ")
    };

    CompletionRequest {
        messages: vec![
            ChatMessage::system(QUICK_CHECK_SYSTEM_PROMPT),
            ChatMessage::user(format!(
                r#"Is "{ingredient}" safe for someone with these allergies: {allergies}?

Reply with a JSON object {{"status": "SAFE" | "UNSAFE" | "UNCERTAIN", "reason": "<brief reason, max 20 words>"}}."#
            )),
        ],
        temperature: ANALYSIS_TEMPERATURE,
    }
}

fn build_user_prompt(ingredients: &str, allergens: &EffectiveAllergens) -> String {
    let family_allergies = if allergens.is_empty() {
        "None specified".to_string()
    } else {
        allergens
            .iter()
            .map(|(name, severity)| match severity {
                Some(severity) => format!("{name} ({severity})"),
                None => name.to_string(),
            })
            .collect::<Vec<_>>()
            .join(", ")
    };

    let alias_hints = ALLERGEN_ALIASES
        .iter()
        .map(|(canonical, aliases)| format!("{canonical}: {}", aliases.join(", ")))
        .collect::<Vec<_>>()
        .join("; ");

    let schema = serde_json::to_string_pretty(&get_ingredient_analysis_schema())
        .unwrap_or_default();

    format!(
        r#"Analyze the following ingredient list and detect any potential allergens.

Ingredient List: "{ingredients}"

Family Allergies to Watch For: {family_allergies}

Common Allergens to Always Check: {common}

Alternative names that imply an allergen: {alias_hints}

Be thorough - check for hidden allergens, cross-contamination risks, and alternative names for allergens.
Report every allergen by its canonical name (for example "milk" for casein), each at most once.
riskLevel must be LOW when detectedAllergens is empty, and MEDIUM or HIGH otherwise.
An ingredient must appear in at most one of safe, concerning and dangerous.

Respond with a JSON object that matches this JSON schema:
{schema}"#,
        common = COMMON_ALLERGENS.join(", "),
    )
}
