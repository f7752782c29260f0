use tracing::debug;
use uuid::Uuid;

use crate::domain::{
    allergy_profile::{
        ports::AllergyProfileRepository,
        value_objects::{EffectiveAllergens, ExplicitAllergen},
    },
    common::entities::app_errors::CoreError,
};

/// Resolve the allergens to screen for.
///
/// A non-empty explicit list wins as-is (names outside the lexicon pass through) and
/// the profile store is not touched. Otherwise the allergy records of every family
/// owned by `owner_id` are aggregated. An owner without records yields an empty set.
pub async fn resolve_effective_allergens<AP>(
    allergy_profile_repository: &AP,
    explicit: Vec<ExplicitAllergen>,
    owner_id: Uuid,
) -> Result<EffectiveAllergens, CoreError>
where
    AP: AllergyProfileRepository,
{
    let explicit: EffectiveAllergens = explicit.into_iter().collect();
    if !explicit.is_empty() {
        debug!(count = explicit.len(), "using explicit allergen list");
        return Ok(explicit);
    }

    let records = allergy_profile_repository
        .get_allergies_by_owner(owner_id)
        .await?;

    let mut resolved = EffectiveAllergens::new();
    for record in &records {
        resolved.insert(&record.allergen, record.severity);
    }

    debug!(
        records = records.len(),
        allergens = resolved.len(),
        "resolved allergens from family profiles"
    );

    Ok(resolved)
}
