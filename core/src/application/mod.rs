use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tracing::warn;

use crate::{
    domain::common::{AllerSafeConfig, AnalysisConfig, LLMConfig, services::Service},
    infrastructure::{
        allergy_profile::repositories::allergy_profile_repository::PostgresAllergyProfileRepository,
        db::postgres::Postgres,
        health::repository::PostgresHealthCheckRepository,
        ingredient_analysis::repositories::scan_history_repository::PostgresScanHistoryRepository,
        llm::openai_client::OpenAiLLMClient,
    },
};

pub type AllerSafeService = Service<
    PostgresAllergyProfileRepository,
    PostgresScanHistoryRepository,
    PostgresHealthCheckRepository,
    OpenAiLLMClient,
>;

pub async fn create_service(config: AllerSafeConfig) -> Result<AllerSafeService, anyhow::Error> {
    let postgres = Postgres::new(&config.database).await?;

    build_service(postgres.get_db(), config.llm, config.analysis)
}

/// Wires the adapters around an already connected database.
pub fn build_service(
    db: Arc<DatabaseConnection>,
    llm: LLMConfig,
    analysis: AnalysisConfig,
) -> Result<AllerSafeService, anyhow::Error> {
    let llm_client = OpenAiLLMClient::new(llm)?;
    if !llm_client.is_configured() {
        warn!("No LLM API key configured, every analysis will use the text matcher");
    }

    Ok(Service::new(
        PostgresAllergyProfileRepository::new(Arc::clone(&db)),
        PostgresScanHistoryRepository::new(Arc::clone(&db)),
        PostgresHealthCheckRepository::new(db),
        llm_client,
        analysis,
    ))
}
