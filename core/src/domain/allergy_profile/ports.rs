use std::future::Future;
use uuid::Uuid;

use crate::domain::{
    allergy_profile::entities::AllergyRecord, common::entities::app_errors::CoreError,
};

/// Read access to the family allergy profiles owned by a user
#[cfg_attr(test, mockall::automock)]
pub trait AllergyProfileRepository: Send + Sync {
    /// Every allergy record of every member of every family created by `owner_id`.
    fn get_allergies_by_owner(
        &self,
        owner_id: Uuid,
    ) -> impl Future<Output = Result<Vec<AllergyRecord>, CoreError>> + Send;
}
