use std::{future::Future, sync::Arc, time::Duration};

use crate::domain::{
    allergy_profile::ports::AllergyProfileRepository,
    common::{AnalysisConfig, entities::app_errors::CoreError},
    health::ports::HealthCheckRepository,
    ingredient_analysis::ports::{LLMClient, ScanHistoryRepository},
};

pub struct Service<AP, SH, HC, LLM>
where
    AP: AllergyProfileRepository,
    SH: ScanHistoryRepository,
    HC: HealthCheckRepository,
    LLM: LLMClient,
{
    pub(crate) allergy_profile_repository: Arc<AP>,
    pub(crate) scan_history_repository: Arc<SH>,
    pub(crate) health_check_repository: Arc<HC>,
    pub(crate) llm_client: Arc<LLM>,
    pub(crate) config: AnalysisConfig,
}

impl<AP, SH, HC, LLM> Service<AP, SH, HC, LLM>
where
    AP: AllergyProfileRepository,
    SH: ScanHistoryRepository,
    HC: HealthCheckRepository,
    LLM: LLMClient,
{
    pub fn new(
        allergy_profile_repository: AP,
        scan_history_repository: SH,
        health_check_repository: HC,
        llm_client: LLM,
        config: AnalysisConfig,
    ) -> Self {
        Self {
            allergy_profile_repository: Arc::new(allergy_profile_repository),
            scan_history_repository: Arc::new(scan_history_repository),
            health_check_repository: Arc::new(health_check_repository),
            llm_client: Arc::new(llm_client),
            config,
        }
    }
}

impl<AP, SH, HC, LLM> Clone for Service<AP, SH, HC, LLM>
where
    AP: AllergyProfileRepository,
    SH: ScanHistoryRepository,
    HC: HealthCheckRepository,
    LLM: LLMClient,
{
    fn clone(&self) -> Self {
        Self {
            allergy_profile_repository: Arc::clone(&self.allergy_profile_repository),
            scan_history_repository: Arc::clone(&self.scan_history_repository),
            health_check_repository: Arc::clone(&self.health_check_repository),
            llm_client: Arc::clone(&self.llm_client),
            config: self.config,
        }
    }
}

/// Runs `fut` under `budget`, mapping an elapsed budget to [`CoreError::Timeout`].
pub(crate) async fn with_timeout<T, F>(budget: Duration, fut: F) -> Result<T, CoreError>
where
    F: Future<Output = Result<T, CoreError>>,
{
    tokio::time::timeout(budget, fut)
        .await
        .map_err(|_| CoreError::Timeout)?
}
