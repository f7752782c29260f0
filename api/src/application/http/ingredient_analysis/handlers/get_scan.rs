use allersafe_core::domain::ingredient_analysis::{
    entities::ScanHistoryRecord, ports::ScanHistoryService, value_objects::GetScanInput,
};
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::{
    auth::RequiredIdentity,
    http::server::{
        api_entities::{
            api_error::{ApiError, ApiErrorResponse},
            response::Response,
        },
        app_state::AppState,
    },
};

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct GetScanResponse {
    pub data: ScanHistoryRecord,
}

#[utoipa::path(
    get,
    path = "/scans/{scan_id}",
    tag = "ingredient-analysis",
    summary = "Get a past scan",
    params(
        ("X-User-Id" = String, Header, description = "Authenticated user id"),
        ("scan_id" = Uuid, Path, description = "Scan ID"),
    ),
    responses(
        (status = 200, body = GetScanResponse),
        (status = 404, body = ApiErrorResponse, description = "Scan not found")
    )
)]
pub async fn get_scan(
    Path(scan_id): Path<Uuid>,
    State(state): State<AppState>,
    RequiredIdentity(identity): RequiredIdentity,
) -> Result<Response<GetScanResponse>, ApiError> {
    let scan = state
        .service
        .get_scan(identity, GetScanInput { scan_id })
        .await
        .map_err(ApiError::from)?;

    Ok(Response::OK(GetScanResponse { data: scan }))
}
