use std::sync::Arc;

use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use tracing::error;
use uuid::Uuid;

use crate::{
    domain::{
        common::entities::app_errors::CoreError,
        ingredient_analysis::{
            entities::ScanHistoryRecord, ports::ScanHistoryRepository,
            value_objects::ScanHistoryFilter,
        },
    },
    entity::scan_history::{
        ActiveModel as ScanActiveModel, Column as ScanColumn, Entity as ScanEntity,
    },
};

#[derive(Debug, Clone)]
pub struct PostgresScanHistoryRepository {
    pub db: Arc<DatabaseConnection>,
}

impl PostgresScanHistoryRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl ScanHistoryRepository for PostgresScanHistoryRepository {
    async fn create_scan(&self, record: ScanHistoryRecord) -> Result<ScanHistoryRecord, CoreError> {
        let analysis = serde_json::to_value(&record.verdict).map_err(|e| {
            error!("Failed to serialize verdict: {}", e);
            CoreError::InternalServerError
        })?;
        let detected = serde_json::to_value(&record.detected).map_err(|e| {
            error!("Failed to serialize detected allergens: {}", e);
            CoreError::InternalServerError
        })?;

        let created = ScanEntity::insert(ScanActiveModel {
            id: Set(record.id),
            user_id: Set(record.user_id),
            ingredients: Set(record.ingredients),
            analysis: Set(analysis),
            detected: Set(detected),
            is_problematic: Set(record.is_problematic),
            analysis_source: Set(record.source.as_str().to_string()),
            created_at: Set(record.created_at.fixed_offset()),
        })
        .exec_with_returning(self.db.as_ref())
        .await
        .map(ScanHistoryRecord::from)
        .map_err(|e| {
            error!("Failed to create scan history record: {}", e);
            CoreError::InternalServerError
        })?;

        Ok(created)
    }

    async fn get_scans_by_user(
        &self,
        user_id: Uuid,
        filter: ScanHistoryFilter,
    ) -> Result<Vec<ScanHistoryRecord>, CoreError> {
        let scans = ScanEntity::find()
            .filter(ScanColumn::UserId.eq(user_id))
            .order_by_desc(ScanColumn::CreatedAt)
            .offset(u64::from(filter.offset))
            .limit(u64::from(filter.limit))
            .all(self.db.as_ref())
            .await
            .map_err(|e| {
                error!("Failed to list scan history: {}", e);
                CoreError::InternalServerError
            })?
            .into_iter()
            .map(ScanHistoryRecord::from)
            .collect();

        Ok(scans)
    }

    async fn get_scan_by_id(
        &self,
        scan_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<ScanHistoryRecord>, CoreError> {
        let scan = ScanEntity::find()
            .filter(ScanColumn::Id.eq(scan_id))
            .filter(ScanColumn::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| {
                error!("Failed to get scan history record: {}", e);
                CoreError::InternalServerError
            })?
            .map(ScanHistoryRecord::from);

        Ok(scan)
    }
}
