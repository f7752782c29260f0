use allersafe_core::domain::authentication::value_objects::Identity;
use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::debug;
use uuid::Uuid;

use super::http::server::api_entities::api_error::ApiError;

/// Header carrying the caller id asserted by the upstream identity provider.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Extractor for the authenticated caller. Rejects with 401 when the header is
/// absent or not a UUID.
pub struct RequiredIdentity(pub Identity);

impl<S> FromRequestParts<S> for RequiredIdentity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| ApiError::Unauthorized("Missing X-User-Id header".to_string()))?;

        let user_id = Uuid::parse_str(raw).map_err(|e| {
            debug!("Rejected X-User-Id header: {}", e);
            ApiError::Unauthorized("Invalid X-User-Id header".to_string())
        })?;

        Ok(RequiredIdentity(Identity::new(user_id)))
    }
}
