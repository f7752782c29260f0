use allersafe_core::domain::ingredient_analysis::{
    entities::ScanHistoryRecord,
    ports::ScanHistoryService,
    value_objects::{GetScanHistoryInput, ScanHistoryFilter},
};
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::{
    auth::RequiredIdentity,
    http::{
        ingredient_analysis::validators::GetScanHistoryParams,
        server::{
            api_entities::{api_error::ApiError, response::Response},
            app_state::AppState,
        },
    },
};

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct GetScanHistoryResponse {
    pub data: Vec<ScanHistoryRecord>,
}

#[utoipa::path(
    get,
    path = "/scans",
    tag = "ingredient-analysis",
    summary = "List past scans",
    description = "Returns the caller's scan history, newest first",
    params(
        ("X-User-Id" = String, Header, description = "Authenticated user id"),
        GetScanHistoryParams
    ),
    responses(
        (status = 200, body = GetScanHistoryResponse)
    )
)]
pub async fn get_scan_history(
    State(state): State<AppState>,
    RequiredIdentity(identity): RequiredIdentity,
    Query(params): Query<GetScanHistoryParams>,
) -> Result<Response<GetScanHistoryResponse>, ApiError> {
    let scans = state
        .service
        .get_scan_history(
            identity,
            GetScanHistoryInput {
                filter: ScanHistoryFilter::new(params.offset, params.limit),
            },
        )
        .await
        .map_err(ApiError::from)?;

    Ok(Response::OK(GetScanHistoryResponse { data: scans }))
}
