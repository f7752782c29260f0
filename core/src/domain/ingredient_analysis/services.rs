use tracing::{error, info, instrument, warn};

use crate::domain::{
    allergy_profile::{
        ports::AllergyProfileRepository, services::resolve_effective_allergens,
        value_objects::EffectiveAllergens,
    },
    authentication::value_objects::Identity,
    common::{
        entities::app_errors::CoreError,
        services::{Service, with_timeout},
    },
    health::ports::HealthCheckRepository,
    ingredient_analysis::{
        entities::{
            AnalysisSource, QuickCheckResult, QuickCheckStatus, ScanHistoryRecord, Verdict,
        },
        matcher::{match_ingredients, quick_check_by_match},
        ports::{IngredientAnalysisService, LLMClient, ScanHistoryRepository, ScanHistoryService},
        prompt::{build_analysis_request, build_quick_check_request},
        reply::{parse_quick_check_reply, parse_verdict_reply},
        value_objects::{
            AnalyzeIngredientsInput, GetScanHistoryInput, GetScanInput, QuickCheckInput,
        },
    },
};

impl<AP, SH, HC, LLM> Service<AP, SH, HC, LLM>
where
    AP: AllergyProfileRepository,
    SH: ScanHistoryRepository,
    HC: HealthCheckRepository,
    LLM: LLMClient,
{
    async fn analyze_with_llm(
        &self,
        ingredients: &str,
        allergens: &EffectiveAllergens,
    ) -> Result<Verdict, CoreError> {
        let request = build_analysis_request(ingredients, allergens);
        let raw = with_timeout(
            self.config.llm_timeout,
            self.llm_client.generate_json(request),
        )
        .await?;

        parse_verdict_reply(&raw)
    }

    async fn quick_check_with_llm(
        &self,
        ingredient: &str,
        allergens: &EffectiveAllergens,
    ) -> Result<(QuickCheckStatus, String), CoreError> {
        let request = build_quick_check_request(ingredient, allergens);
        let raw = with_timeout(
            self.config.llm_timeout,
            self.llm_client.generate_json(request),
        )
        .await?;

        parse_quick_check_reply(&raw)
    }

    async fn store_scan(&self, record: ScanHistoryRecord) {
        let scan_id = record.id;
        let stored = with_timeout(
            self.config.store_timeout,
            self.scan_history_repository.create_scan(record),
        )
        .await;

        if let Err(e) = stored {
            error!(%scan_id, "Failed to store scan history: {}", e);
        }
    }
}

impl<AP, SH, HC, LLM> IngredientAnalysisService for Service<AP, SH, HC, LLM>
where
    AP: AllergyProfileRepository,
    SH: ScanHistoryRepository,
    HC: HealthCheckRepository,
    LLM: LLMClient,
{
    #[instrument(skip_all, fields(user_id = %identity.id()))]
    async fn analyze_ingredients(
        &self,
        identity: Identity,
        input: AnalyzeIngredientsInput,
    ) -> Result<Verdict, CoreError> {
        let ingredients = input.ingredients.trim();
        if ingredients.is_empty() {
            return Err(CoreError::Invalid(
                "Ingredients text is required".to_string(),
            ));
        }

        let allergens = with_timeout(
            self.config.store_timeout,
            resolve_effective_allergens(
                self.allergy_profile_repository.as_ref(),
                input.allergies,
                identity.id(),
            ),
        )
        .await?;

        let (verdict, source) = match self.analyze_with_llm(ingredients, &allergens).await {
            Ok(verdict) => (verdict, AnalysisSource::Ai),
            Err(e) => {
                warn!("AI analysis unavailable, using text matcher: {}", e);
                (
                    match_ingredients(ingredients, &allergens),
                    AnalysisSource::Fallback,
                )
            }
        };

        info!(
            risk_level = verdict.risk_level.as_str(),
            detected = verdict.detected_allergens.len(),
            source = source.as_str(),
            "Ingredient analysis completed"
        );

        self.store_scan(ScanHistoryRecord::new(
            identity.id(),
            ingredients.to_string(),
            verdict.clone(),
            source,
        ))
        .await;

        Ok(verdict)
    }

    #[instrument(skip_all, fields(user_id = %identity.id()))]
    async fn quick_check(
        &self,
        identity: Identity,
        input: QuickCheckInput,
    ) -> Result<QuickCheckResult, CoreError> {
        let ingredient = input.ingredient.trim();
        if ingredient.is_empty() {
            return Err(CoreError::Invalid("Ingredient is required".to_string()));
        }

        let allergens = with_timeout(
            self.config.store_timeout,
            resolve_effective_allergens(
                self.allergy_profile_repository.as_ref(),
                input.allergies,
                identity.id(),
            ),
        )
        .await?;

        let ((status, reason), source) =
            match self.quick_check_with_llm(ingredient, &allergens).await {
                Ok(answer) => (answer, AnalysisSource::Ai),
                Err(e) => {
                    warn!("AI quick check unavailable, using text matcher: {}", e);
                    (
                        quick_check_by_match(ingredient, &allergens),
                        AnalysisSource::Fallback,
                    )
                }
            };

        info!(
            status = ?status,
            source = source.as_str(),
            "Quick ingredient check completed"
        );

        Ok(QuickCheckResult::new(
            ingredient.to_string(),
            status,
            reason,
            source,
        ))
    }
}

impl<AP, SH, HC, LLM> ScanHistoryService for Service<AP, SH, HC, LLM>
where
    AP: AllergyProfileRepository,
    SH: ScanHistoryRepository,
    HC: HealthCheckRepository,
    LLM: LLMClient,
{
    async fn get_scan_history(
        &self,
        identity: Identity,
        input: GetScanHistoryInput,
    ) -> Result<Vec<ScanHistoryRecord>, CoreError> {
        with_timeout(
            self.config.store_timeout,
            self.scan_history_repository
                .get_scans_by_user(identity.id(), input.filter),
        )
        .await
    }

    async fn get_scan(
        &self,
        identity: Identity,
        input: GetScanInput,
    ) -> Result<ScanHistoryRecord, CoreError> {
        with_timeout(
            self.config.store_timeout,
            self.scan_history_repository
                .get_scan_by_id(input.scan_id, identity.id()),
        )
        .await?
        .ok_or(CoreError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{Arc, Mutex},
        time::Duration,
    };

    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::domain::{
        allergy_profile::{
            entities::{AllergyRecord, Severity},
            ports::MockAllergyProfileRepository,
            value_objects::ExplicitAllergen,
        },
        common::AnalysisConfig,
        health::ports::MockHealthCheckRepository,
        ingredient_analysis::{
            entities::RiskLevel,
            ports::{MockLLMClient, MockScanHistoryRepository},
            value_objects::ScanHistoryFilter,
        },
    };

    type TestService = Service<
        MockAllergyProfileRepository,
        MockScanHistoryRepository,
        MockHealthCheckRepository,
        MockLLMClient,
    >;

    fn service(
        profiles: MockAllergyProfileRepository,
        history: MockScanHistoryRepository,
        llm: MockLLMClient,
    ) -> TestService {
        Service::new(
            profiles,
            history,
            MockHealthCheckRepository::new(),
            llm,
            AnalysisConfig::default(),
        )
    }

    fn no_profiles() -> MockAllergyProfileRepository {
        let mut profiles = MockAllergyProfileRepository::new();
        profiles
            .expect_get_allergies_by_owner()
            .returning(|_| Box::pin(async { Ok(Vec::new()) }));
        profiles
    }

    /// History that keeps every created scan so tests can read it back.
    fn recording_history() -> (MockScanHistoryRepository, Arc<Mutex<Vec<ScanHistoryRecord>>>) {
        let stored = Arc::new(Mutex::new(Vec::new()));
        let mut history = MockScanHistoryRepository::new();

        let sink = Arc::clone(&stored);
        history.expect_create_scan().returning(move |record| {
            sink.lock().unwrap().push(record.clone());
            Box::pin(async move { Ok(record) })
        });

        let rows = Arc::clone(&stored);
        history
            .expect_get_scans_by_user()
            .returning(move |user_id, filter| {
                let scans: Vec<ScanHistoryRecord> = rows
                    .lock()
                    .unwrap()
                    .iter()
                    .rev()
                    .filter(|r| r.user_id == user_id)
                    .skip(filter.offset as usize)
                    .take(filter.limit as usize)
                    .cloned()
                    .collect();
                Box::pin(async move { Ok(scans) })
            });

        let rows = Arc::clone(&stored);
        history
            .expect_get_scan_by_id()
            .returning(move |scan_id, user_id| {
                let scan = rows
                    .lock()
                    .unwrap()
                    .iter()
                    .find(|r| r.id == scan_id && r.user_id == user_id)
                    .cloned();
                Box::pin(async move { Ok(scan) })
            });

        (history, stored)
    }

    fn replying_llm(raw: &'static str) -> MockLLMClient {
        let mut llm = MockLLMClient::new();
        llm.expect_generate_json()
            .times(1)
            .returning(move |_| Box::pin(async move { Ok(raw.to_string()) }));
        llm
    }

    fn failing_llm() -> MockLLMClient {
        let mut llm = MockLLMClient::new();
        llm.expect_generate_json().returning(|_| {
            Box::pin(async {
                Err(CoreError::ExternalServiceError(
                    "connection refused".to_string(),
                ))
            })
        });
        llm
    }

    fn unused_llm() -> MockLLMClient {
        let mut llm = MockLLMClient::new();
        llm.expect_generate_json().times(0);
        llm
    }

    fn input(ingredients: &str, allergies: &[&str]) -> AnalyzeIngredientsInput {
        AnalyzeIngredientsInput {
            ingredients: ingredients.to_string(),
            allergies: allergies
                .iter()
                .map(|name| ExplicitAllergen::new(*name, None))
                .collect(),
        }
    }

    fn quick_input(ingredient: &str, allergies: &[&str]) -> QuickCheckInput {
        QuickCheckInput {
            ingredient: ingredient.to_string(),
            allergies: allergies
                .iter()
                .map(|name| ExplicitAllergen::new(*name, None))
                .collect(),
        }
    }

    const AI_REPLY: &str = r#"{
        "detectedAllergens": ["peanuts"],
        "riskLevel": "MEDIUM",
        "analysis": "Peanut oil is a peanut derivative.",
        "recommendations": "Avoid this product.",
        "ingredientBreakdown": {"safe": ["Water"], "concerning": [], "dangerous": ["Peanut Oil"]},
        "crossContaminationRisk": "low"
    }"#;

    #[tokio::test]
    async fn test_ai_verdict_is_returned_and_recorded() {
        let identity = Identity::new(Uuid::new_v4());
        let (history, stored) = recording_history();
        let service = service(no_profiles(), history, replying_llm(AI_REPLY));

        let verdict = service
            .analyze_ingredients(identity, input("Water, Peanut Oil", &["peanuts"]))
            .await
            .unwrap();

        assert_eq!(verdict.detected_allergens, vec!["peanuts"]);
        assert_eq!(verdict.analysis, "Peanut oil is a peanut derivative.");

        let stored = stored.lock().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].source, AnalysisSource::Ai);
        assert_eq!(stored[0].user_id, identity.id());
        assert!(stored[0].is_problematic);
        assert_eq!(stored[0].verdict, verdict);
    }

    #[tokio::test]
    async fn test_llm_failure_falls_back_to_matcher() {
        let (history, stored) = recording_history();
        let service = service(no_profiles(), history, failing_llm());

        let verdict = service
            .analyze_ingredients(
                Identity::new(Uuid::new_v4()),
                input(
                    "Water, Wheat Flour, Sugar, Peanut Oil, Salt",
                    &["peanut", "dairy", "gluten", "shellfish"],
                ),
            )
            .await
            .unwrap();

        let mut detected = verdict.detected_allergens.clone();
        detected.sort();
        assert_eq!(detected, vec!["peanut", "wheat"]);
        assert_eq!(verdict.risk_level, RiskLevel::Medium);

        assert_eq!(stored.lock().unwrap()[0].source, AnalysisSource::Fallback);
    }

    #[tokio::test]
    async fn test_malformed_reply_falls_back_to_matcher() {
        let (history, _) = recording_history();
        let service = service(no_profiles(), history, replying_llm("I think it is safe."));

        let verdict = service
            .analyze_ingredients(Identity::new(Uuid::new_v4()), input("Rice, water", &[]))
            .await
            .unwrap();

        assert_eq!(verdict.risk_level, RiskLevel::Low);
        assert_eq!(verdict.summary, "No obvious allergens detected in ingredient list");
    }

    #[tokio::test]
    async fn test_overlapping_buckets_fall_back_to_matcher() {
        let (history, stored) = recording_history();
        let service = service(
            no_profiles(),
            history,
            replying_llm(
                r#"{
                    "detectedAllergens": ["milk"],
                    "riskLevel": "MEDIUM",
                    "analysis": "Milk found.",
                    "recommendations": "Avoid.",
                    "ingredientBreakdown": {"safe": ["Milk"], "concerning": ["Milk"], "dangerous": ["Milk"]}
                }"#,
            ),
        );

        let verdict = service
            .analyze_ingredients(Identity::new(Uuid::new_v4()), input("Milk, Sugar", &[]))
            .await
            .unwrap();

        assert_eq!(verdict.ingredient_breakdown.dangerous, vec!["Milk"]);
        assert_eq!(verdict.ingredient_breakdown.safe, vec!["Sugar"]);
        assert!(verdict.ingredient_breakdown.concerning.is_empty());
        assert_eq!(stored.lock().unwrap()[0].source, AnalysisSource::Fallback);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_llm_times_out_into_fallback() {
        let (history, stored) = recording_history();
        let mut llm = MockLLMClient::new();
        llm.expect_generate_json().returning(|_| {
            Box::pin(async {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(String::new())
            })
        });
        let service = service(no_profiles(), history, llm);

        let verdict = service
            .analyze_ingredients(
                Identity::new(Uuid::new_v4()),
                input("milk powder, sugar", &[]),
            )
            .await
            .unwrap();

        assert_eq!(verdict.detected_allergens, vec!["milk"]);
        assert_eq!(stored.lock().unwrap()[0].source, AnalysisSource::Fallback);
    }

    #[tokio::test]
    async fn test_blank_ingredients_are_rejected_without_side_effects() {
        let mut history = MockScanHistoryRepository::new();
        history.expect_create_scan().times(0);
        let service = service(no_profiles(), history, unused_llm());

        let err = service
            .analyze_ingredients(Identity::new(Uuid::new_v4()), input("  \n ", &["peanut"]))
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::Invalid(_)));
    }

    #[tokio::test]
    async fn test_history_failure_does_not_change_response() {
        let mut history = MockScanHistoryRepository::new();
        history
            .expect_create_scan()
            .times(1)
            .returning(|_| Box::pin(async { Err(CoreError::InternalServerError) }));
        let service = service(no_profiles(), history, failing_llm());

        let verdict = service
            .analyze_ingredients(
                Identity::new(Uuid::new_v4()),
                input("contains cashew pieces", &["almond"]),
            )
            .await
            .unwrap();

        assert_eq!(verdict.detected_allergens, vec!["nuts"]);
        assert_eq!(verdict.risk_level, RiskLevel::Medium);
    }

    #[tokio::test]
    async fn test_profile_allergens_are_used_when_list_is_empty() {
        let owner = Identity::new(Uuid::new_v4());
        let owner_id = owner.id();
        let mut profiles = MockAllergyProfileRepository::new();
        profiles
            .expect_get_allergies_by_owner()
            .withf(move |id| *id == owner_id)
            .times(1)
            .returning(|_| {
                Box::pin(async {
                    Ok(vec![AllergyRecord {
                        id: Uuid::new_v4(),
                        member_id: Uuid::new_v4(),
                        allergen: "Kiwi".to_string(),
                        severity: Some(Severity::Severe),
                        created_at: Utc::now(),
                    }])
                })
            });
        let (history, _) = recording_history();
        let service = service(profiles, history, failing_llm());

        let verdict = service
            .analyze_ingredients(owner, input("kiwi puree, sugar", &[]))
            .await
            .unwrap();

        assert_eq!(verdict.detected_allergens, vec!["kiwi"]);
        assert_eq!(verdict.warnings[0].severity, Some(Severity::Severe));
    }

    #[tokio::test]
    async fn test_profile_failure_is_an_error() {
        let mut profiles = MockAllergyProfileRepository::new();
        profiles
            .expect_get_allergies_by_owner()
            .returning(|_| Box::pin(async { Err(CoreError::InternalServerError) }));
        let mut history = MockScanHistoryRepository::new();
        history.expect_create_scan().times(0);
        let service = service(profiles, history, unused_llm());

        let result = service
            .analyze_ingredients(Identity::new(Uuid::new_v4()), input("peanut oil", &[]))
            .await;

        assert_eq!(result.unwrap_err(), CoreError::InternalServerError);
    }

    #[tokio::test]
    async fn test_scans_are_scoped_to_their_owner() {
        let owner = Identity::new(Uuid::new_v4());
        let stranger = Identity::new(Uuid::new_v4());
        let (history, _) = recording_history();
        let service = service(no_profiles(), history, failing_llm());

        service
            .analyze_ingredients(owner, input("soy lecithin", &[]))
            .await
            .unwrap();
        let scans = service
            .get_scan_history(
                owner,
                GetScanHistoryInput {
                    filter: ScanHistoryFilter::default(),
                },
            )
            .await
            .unwrap();
        assert_eq!(scans.len(), 1);

        let scan_id = scans[0].id;
        let own = service.get_scan(owner, GetScanInput { scan_id }).await.unwrap();
        assert_eq!(own.ingredients, "soy lecithin");

        let err = service
            .get_scan(stranger, GetScanInput { scan_id })
            .await
            .unwrap_err();
        assert_eq!(err, CoreError::NotFound);
    }

    #[tokio::test]
    async fn test_quick_check_uses_model_answer() {
        let mut history = MockScanHistoryRepository::new();
        history.expect_create_scan().times(0);
        let service = service(
            no_profiles(),
            history,
            replying_llm(r#"{"status": "UNSAFE", "reason": "Tahini is made from sesame."}"#),
        );

        let result = service
            .quick_check(Identity::new(Uuid::new_v4()), quick_input(" tahini ", &["sesame"]))
            .await
            .unwrap();

        assert_eq!(result.ingredient, "tahini");
        assert_eq!(result.status, QuickCheckStatus::Unsafe);
        assert!(!result.safe);
        assert_eq!(result.reason, "Tahini is made from sesame.");
        assert_eq!(result.source, AnalysisSource::Ai);
    }

    #[tokio::test]
    async fn test_quick_check_falls_back_to_matcher() {
        let service = service(
            no_profiles(),
            MockScanHistoryRepository::new(),
            failing_llm(),
        );

        let unsafe_result = service
            .quick_check(Identity::new(Uuid::new_v4()), quick_input("whey powder", &[]))
            .await
            .unwrap();
        assert_eq!(unsafe_result.status, QuickCheckStatus::Unsafe);
        assert_eq!(unsafe_result.reason, "Contains milk");
        assert_eq!(unsafe_result.source, AnalysisSource::Fallback);

        let safe_result = service
            .quick_check(Identity::new(Uuid::new_v4()), quick_input("brown rice", &[]))
            .await
            .unwrap();
        assert_eq!(safe_result.status, QuickCheckStatus::Safe);
        assert!(safe_result.safe);
    }

    #[tokio::test]
    async fn test_quick_check_rejects_blank_ingredient() {
        let mut profiles = MockAllergyProfileRepository::new();
        profiles.expect_get_allergies_by_owner().times(0);
        let service = service(profiles, MockScanHistoryRepository::new(), unused_llm());

        let err = service
            .quick_check(Identity::new(Uuid::new_v4()), quick_input("   ", &["milk"]))
            .await
            .unwrap_err();

        assert_eq!(err, CoreError::Invalid("Ingredient is required".to_string()));
    }
}
