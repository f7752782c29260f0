use crate::domain::{
    allergy_profile::ports::AllergyProfileRepository,
    common::{
        entities::app_errors::CoreError,
        services::{Service, with_timeout},
    },
    health::{
        entities::DatabaseHealthStatus,
        ports::{HealthCheckRepository, HealthCheckService},
    },
    ingredient_analysis::ports::{LLMClient, ScanHistoryRepository},
};

impl<AP, SH, HC, LLM> HealthCheckService for Service<AP, SH, HC, LLM>
where
    AP: AllergyProfileRepository,
    SH: ScanHistoryRepository,
    HC: HealthCheckRepository,
    LLM: LLMClient,
{
    async fn readiness(&self) -> Result<DatabaseHealthStatus, CoreError> {
        with_timeout(
            self.config.store_timeout,
            self.health_check_repository.readiness(),
        )
        .await
    }
}
