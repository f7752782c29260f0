use tracing::warn;

use crate::{
    domain::allergy_profile::entities::{AllergyRecord, Severity},
    entity::allergies,
};

impl From<&allergies::Model> for AllergyRecord {
    fn from(model: &allergies::Model) -> Self {
        let severity = model
            .severity
            .as_deref()
            .and_then(|raw| match raw.parse::<Severity>() {
                Ok(severity) => Some(severity),
                Err(_) => {
                    warn!(allergy_id = %model.id, "Ignoring unknown severity '{}'", raw);
                    None
                }
            });

        Self {
            id: model.id,
            member_id: model.member_id,
            allergen: model.name.clone(),
            severity,
            created_at: model.created_at.to_utc(),
        }
    }
}

impl From<allergies::Model> for AllergyRecord {
    fn from(model: allergies::Model) -> Self {
        Self::from(&model)
    }
}
