use std::sync::Arc;

use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait,
};
use tracing::error;
use uuid::Uuid;

use crate::{
    domain::{
        allergy_profile::{entities::AllergyRecord, ports::AllergyProfileRepository},
        common::entities::app_errors::CoreError,
    },
    entity::{
        allergies::{Column as AllergyColumn, Entity as AllergyEntity},
        families::Column as FamilyColumn,
        family_members::{Entity as FamilyMemberEntity, Relation as FamilyMemberRelation},
    },
};

#[derive(Debug, Clone)]
pub struct PostgresAllergyProfileRepository {
    pub db: Arc<DatabaseConnection>,
}

impl PostgresAllergyProfileRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl AllergyProfileRepository for PostgresAllergyProfileRepository {
    async fn get_allergies_by_owner(&self, owner_id: Uuid) -> Result<Vec<AllergyRecord>, CoreError> {
        let records = AllergyEntity::find()
            .inner_join(FamilyMemberEntity)
            .join(JoinType::InnerJoin, FamilyMemberRelation::Families.def())
            .filter(FamilyColumn::CreatedBy.eq(owner_id))
            .order_by_asc(AllergyColumn::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| {
                error!("Failed to load family allergies: {}", e);
                CoreError::InternalServerError
            })?
            .into_iter()
            .map(AllergyRecord::from)
            .collect();

        Ok(records)
    }
}
