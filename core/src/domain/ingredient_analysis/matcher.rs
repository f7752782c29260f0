use std::{collections::HashSet, sync::LazyLock};

use regex::Regex;

use crate::domain::{
    allergy_profile::value_objects::EffectiveAllergens,
    ingredient_analysis::{
        entities::{
            AllergenWarning, CrossContaminationRisk, IngredientBreakdown, QuickCheckStatus,
            RiskLevel, Verdict,
        },
        lexicon,
    },
};

static INGREDIENT_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,;()\[\]\n\r]+").expect("separator pattern is valid"));

#[derive(Debug)]
struct Detection {
    allergen: String,
    term: String,
}

#[derive(Debug, Default)]
struct Detections {
    found: Vec<Detection>,
    terms: Vec<String>,
}

impl Detections {
    fn record(&mut self, allergen: &str, term: &str) {
        if !self.terms.iter().any(|t| t == term) {
            self.terms.push(term.to_string());
        }
        if !self.found.iter().any(|d| d.allergen == allergen) {
            self.found.push(Detection {
                allergen: allergen.to_string(),
                term: term.to_string(),
            });
        }
    }
}

/// Deterministic fallback analysis: case-insensitive substring matching of the
/// ingredient text against the caller's allergens, the baseline lexicon and the
/// alias table. Pure and infallible.
pub fn match_ingredients(ingredients: &str, allergens: &EffectiveAllergens) -> Verdict {
    let text = ingredients.to_lowercase();
    let mut detections = Detections::default();

    for name in allergens.names() {
        if text.contains(name) {
            let canonical = lexicon::canonical_for_alias(name).unwrap_or(name);
            detections.record(canonical, name);
        }
    }

    for name in lexicon::COMMON_ALLERGENS {
        if text.contains(name) {
            detections.record(name, name);
        }
    }

    for (canonical, alias) in lexicon::aliases() {
        if text.contains(alias) {
            detections.record(canonical, alias);
        }
    }

    let tokens = tokenize(ingredients);
    let breakdown = classify_tokens(&tokens, &detections.terms);
    let warnings = build_warnings(&detections, &tokens, allergens);

    let cross_contamination_risk = if lexicon::has_precautionary_phrase(&text) {
        CrossContaminationRisk::High
    } else {
        CrossContaminationRisk::Unknown
    };

    let detected: Vec<String> = detections.found.into_iter().map(|d| d.allergen).collect();
    let risk_level = RiskLevel::from_detection_count(detected.len());

    let (analysis, recommendations) = if detected.is_empty() {
        (
            "No obvious allergens detected in ingredient list".to_string(),
            "Appears safe based on ingredient analysis, but always verify with manufacturer."
                .to_string(),
        )
    } else {
        (
            format!("Found potential allergens: {}", detected.join(", ")),
            "AVOID this product due to detected allergens. Double-check with manufacturer."
                .to_string(),
        )
    };

    Verdict::new(
        risk_level,
        detected,
        analysis,
        recommendations,
        breakdown,
        warnings,
        cross_contamination_risk,
    )
}

/// Fallback answer for a single ingredient: any detection is UNSAFE, a bare
/// precautionary label is UNCERTAIN, anything else is SAFE.
pub fn quick_check_by_match(
    ingredient: &str,
    allergens: &EffectiveAllergens,
) -> (QuickCheckStatus, String) {
    let verdict = match_ingredients(ingredient, allergens);

    if !verdict.detected_allergens.is_empty() {
        (
            QuickCheckStatus::Unsafe,
            format!("Contains {}", verdict.detected_allergens.join(", ")),
        )
    } else if verdict.cross_contamination_risk == CrossContaminationRisk::High {
        (
            QuickCheckStatus::Uncertain,
            "Labelled as possibly containing allergen traces".to_string(),
        )
    } else {
        (
            QuickCheckStatus::Safe,
            "No listed allergens found in this ingredient".to_string(),
        )
    }
}

/// Split an ingredient list into trimmed, case-insensitively unique tokens.
fn tokenize(ingredients: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    let mut seen = HashSet::new();

    for raw in INGREDIENT_SEPARATORS.split(ingredients) {
        let token = raw.trim_matches(|c: char| c.is_whitespace() || c == '.' || c == ':');
        if token.is_empty() {
            continue;
        }
        if !seen.insert(token.to_lowercase()) {
            continue;
        }
        tokens.push(token.to_string());
    }

    tokens
}

fn classify_tokens(tokens: &[String], terms: &[String]) -> IngredientBreakdown {
    let mut breakdown = IngredientBreakdown::default();

    for token in tokens {
        let lower = token.to_lowercase();
        if terms.iter().any(|term| lower.contains(term.as_str())) {
            breakdown.dangerous.push(token.clone());
        } else if lexicon::has_precautionary_phrase(&lower) {
            breakdown.concerning.push(token.clone());
        } else {
            breakdown.safe.push(token.clone());
        }
    }

    breakdown
}

fn build_warnings(
    detections: &Detections,
    tokens: &[String],
    allergens: &EffectiveAllergens,
) -> Vec<AllergenWarning> {
    detections
        .found
        .iter()
        .map(|detection| {
            let ingredient = tokens
                .iter()
                .find(|t| t.to_lowercase().contains(detection.term.as_str()))
                .cloned()
                .unwrap_or_else(|| detection.term.clone());

            let reason = if detection.term == detection.allergen {
                format!("Ingredient list mentions {}", detection.allergen)
            } else {
                format!("'{}' indicates {}", detection.term, detection.allergen)
            };

            AllergenWarning {
                allergen: detection.allergen.clone(),
                severity: allergens
                    .severity_of(&detection.allergen)
                    .or_else(|| allergens.severity_of(&detection.term)),
                ingredient,
                reason,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::domain::allergy_profile::{entities::Severity, value_objects::ExplicitAllergen};

    fn allergens(names: &[&str]) -> EffectiveAllergens {
        names.iter().copied().collect()
    }

    fn detected_set(verdict: &Verdict) -> HashSet<&str> {
        verdict
            .detected_allergens
            .iter()
            .map(String::as_str)
            .collect()
    }

    #[test]
    fn test_wheat_flour_and_peanut_oil_is_medium() {
        let verdict = match_ingredients(
            "Water, Wheat Flour, Sugar, Peanut Oil, Salt",
            &allergens(&["peanut", "dairy", "gluten", "shellfish"]),
        );

        assert_eq!(detected_set(&verdict), HashSet::from(["peanut", "wheat"]));
        assert_eq!(verdict.risk_level, RiskLevel::Medium);
        assert_eq!(verdict.ingredient_breakdown.dangerous, vec!["Wheat Flour", "Peanut Oil"]);
        assert_eq!(verdict.ingredient_breakdown.safe, vec!["Water", "Sugar", "Salt"]);
        assert!(verdict.ingredient_breakdown.concerning.is_empty());
    }

    #[test]
    fn test_alias_reports_canonical_name() {
        let verdict = match_ingredients("contains cashew pieces", &allergens(&["almond"]));

        assert_eq!(verdict.detected_allergens, vec!["nuts"]);
        assert_eq!(verdict.risk_level, RiskLevel::Medium);
        assert_eq!(verdict.warnings[0].ingredient, "contains cashew pieces");
    }

    #[test]
    fn test_explicit_alias_is_reported_as_canonical() {
        let verdict = match_ingredients("Sodium casein, salt", &allergens(&["casein"]));

        assert_eq!(verdict.detected_allergens, vec!["milk"]);
        assert!(!verdict.detected_allergens.iter().any(|a| a == "casein"));
    }

    #[test]
    fn test_baseline_is_screened_without_profile() {
        let verdict = match_ingredients("Rice, SESAME seeds", &EffectiveAllergens::new());

        assert_eq!(verdict.detected_allergens, vec!["sesame"]);
    }

    #[test]
    fn test_detections_are_unique() {
        let verdict = match_ingredients(
            "milk, whey, butter, cream, cheese, skimmed milk powder",
            &allergens(&["milk", "dairy"]),
        );

        assert_eq!(verdict.detected_allergens, vec!["milk"]);
        assert_eq!(verdict.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn test_three_allergens_is_high() {
        let verdict = match_ingredients("eggs, milk, peanuts", &EffectiveAllergens::new());

        assert_eq!(
            detected_set(&verdict),
            HashSet::from(["eggs", "milk", "peanuts"])
        );
        assert_eq!(verdict.risk_level, RiskLevel::High);
        assert_eq!(
            verdict.recommendations,
            "AVOID this product due to detected allergens. Double-check with manufacturer."
        );
    }

    #[test]
    fn test_clean_list_is_low() {
        let verdict = match_ingredients("Rice, water, salt", &allergens(&["peanut"]));

        assert!(verdict.detected_allergens.is_empty());
        assert_eq!(verdict.risk_level, RiskLevel::Low);
        assert_eq!(
            verdict.analysis,
            "No obvious allergens detected in ingredient list"
        );
        assert_eq!(verdict.ingredient_breakdown.safe, vec!["Rice", "water", "salt"]);
        assert_eq!(verdict.cross_contamination_risk, CrossContaminationRisk::Unknown);
    }

    #[test]
    fn test_precautionary_label_is_concerning() {
        let verdict = match_ingredients(
            "Oats, honey. May contain traces of sesame",
            &EffectiveAllergens::new(),
        );

        assert_eq!(verdict.cross_contamination_risk, CrossContaminationRisk::High);
        assert_eq!(verdict.detected_allergens, vec!["sesame"]);
        assert_eq!(
            verdict.ingredient_breakdown.dangerous,
            vec!["honey. May contain traces of sesame"]
        );
    }

    #[test]
    fn test_precautionary_phrase_without_allergen() {
        let verdict = match_ingredients(
            "Oats; made in a facility that handles seeds",
            &EffectiveAllergens::new(),
        );

        assert_eq!(verdict.risk_level, RiskLevel::Low);
        assert_eq!(
            verdict.ingredient_breakdown.concerning,
            vec!["made in a facility that handles seeds"]
        );
    }

    #[test]
    fn test_buckets_are_disjoint() {
        let verdict = match_ingredients(
            "flour, sugar, Flour, soy lecithin, may contain nuts",
            &allergens(&["soy"]),
        );
        let breakdown = &verdict.ingredient_breakdown;

        let mut seen = HashSet::new();
        for token in breakdown
            .safe
            .iter()
            .chain(&breakdown.concerning)
            .chain(&breakdown.dangerous)
        {
            assert!(seen.insert(token.to_lowercase()), "{token} appears twice");
        }
    }

    #[test]
    fn test_warning_carries_profile_severity() {
        let profile: EffectiveAllergens =
            vec![ExplicitAllergen::new("peanuts", Some(Severity::Severe))]
                .into_iter()
                .collect();

        let verdict = match_ingredients("roasted peanuts", &profile);

        assert_eq!(verdict.warnings.len(), 1);
        assert_eq!(verdict.warnings[0].allergen, "peanuts");
        assert_eq!(verdict.warnings[0].severity, Some(Severity::Severe));
    }

    #[test]
    fn test_safety_rating_tracks_risk_level() {
        for text in ["rice", "milk", "milk, eggs, fish"] {
            let verdict = match_ingredients(text, &EffectiveAllergens::new());
            assert_eq!(verdict.safety_rating, verdict.risk_level.safety_rating());
            assert_eq!(
                verdict.risk_level == RiskLevel::Low,
                verdict.detected_allergens.is_empty()
            );
        }
    }

    #[test]
    fn test_tokens_are_unique_across_unicode_case() {
        let tokens = tokenize("ÄPFEL, äpfel, Äpfel");

        assert_eq!(tokens, vec!["ÄPFEL"]);
    }

    #[test]
    fn test_quick_check_by_match() {
        let allergens: EffectiveAllergens = vec![ExplicitAllergen::new("sesame", None)]
            .into_iter()
            .collect();

        let (status, reason) = quick_check_by_match("Toasted Sesame Oil", &allergens);
        assert_eq!(status, QuickCheckStatus::Unsafe);
        assert_eq!(reason, "Contains sesame");

        let (status, _) = quick_check_by_match("may contain traces", &allergens);
        assert_eq!(status, QuickCheckStatus::Uncertain);

        let (status, _) = quick_check_by_match("brown rice", &allergens);
        assert_eq!(status, QuickCheckStatus::Safe);
    }
}
