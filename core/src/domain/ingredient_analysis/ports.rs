use std::future::Future;
use uuid::Uuid;

use crate::domain::{
    authentication::value_objects::Identity,
    common::entities::app_errors::CoreError,
    ingredient_analysis::{
        entities::{QuickCheckResult, ScanHistoryRecord, Verdict},
        value_objects::{
            AnalyzeIngredientsInput, CompletionRequest, GetScanHistoryInput, GetScanInput,
            QuickCheckInput, ScanHistoryFilter,
        },
    },
};

/// LLM Client trait for calling chat completion models
#[cfg_attr(test, mockall::automock)]
pub trait LLMClient: Send + Sync {
    /// Returns the raw text of the first completion choice.
    fn generate_json(
        &self,
        request: CompletionRequest,
    ) -> impl Future<Output = Result<String, CoreError>> + Send;
}

/// Repository trait for scan history records
#[cfg_attr(test, mockall::automock)]
pub trait ScanHistoryRepository: Send + Sync {
    fn create_scan(
        &self,
        record: ScanHistoryRecord,
    ) -> impl Future<Output = Result<ScanHistoryRecord, CoreError>> + Send;

    fn get_scans_by_user(
        &self,
        user_id: Uuid,
        filter: ScanHistoryFilter,
    ) -> impl Future<Output = Result<Vec<ScanHistoryRecord>, CoreError>> + Send;

    fn get_scan_by_id(
        &self,
        scan_id: Uuid,
        user_id: Uuid,
    ) -> impl Future<Output = Result<Option<ScanHistoryRecord>, CoreError>> + Send;
}

/// Service trait for the ingredient safety analysis
pub trait IngredientAnalysisService: Send + Sync {
    fn analyze_ingredients(
        &self,
        identity: Identity,
        input: AnalyzeIngredientsInput,
    ) -> impl Future<Output = Result<Verdict, CoreError>> + Send;

    fn quick_check(
        &self,
        identity: Identity,
        input: QuickCheckInput,
    ) -> impl Future<Output = Result<QuickCheckResult, CoreError>> + Send;
}

/// Service trait for reading back persisted scans
pub trait ScanHistoryService: Send + Sync {
    fn get_scan_history(
        &self,
        identity: Identity,
        input: GetScanHistoryInput,
    ) -> impl Future<Output = Result<Vec<ScanHistoryRecord>, CoreError>> + Send;

    fn get_scan(
        &self,
        identity: Identity,
        input: GetScanInput,
    ) -> impl Future<Output = Result<ScanHistoryRecord, CoreError>> + Send;
}
