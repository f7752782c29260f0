use allersafe_core::domain::ingredient_analysis::{
    entities::QuickCheckResult, ports::IngredientAnalysisService,
    value_objects::QuickCheckInput,
};
use axum::extract::State;

use crate::application::{
    auth::RequiredIdentity,
    http::{
        ingredient_analysis::validators::QuickCheckRequest,
        server::{
            api_entities::{
                api_error::{ApiError, ApiErrorResponse, ValidateJson},
                response::Response,
            },
            app_state::AppState,
        },
    },
};

#[utoipa::path(
    post,
    path = "/quick-check",
    tag = "ingredient-analysis",
    summary = "Check a single ingredient",
    description = "Answers SAFE, UNSAFE or UNCERTAIN for one ingredient against the caller's allergens. Nothing is recorded in the scan history.",
    params(
        ("X-User-Id" = String, Header, description = "Authenticated user id"),
    ),
    request_body = QuickCheckRequest,
    responses(
        (status = 200, body = QuickCheckResult),
        (status = 400, body = ApiErrorResponse),
        (status = 401, body = ApiErrorResponse),
        (status = 500, body = ApiErrorResponse)
    )
)]
pub async fn quick_check(
    State(state): State<AppState>,
    RequiredIdentity(identity): RequiredIdentity,
    ValidateJson(payload): ValidateJson<QuickCheckRequest>,
) -> Result<Response<QuickCheckResult>, ApiError> {
    let result = state
        .service
        .quick_check(identity, QuickCheckInput::from(payload))
        .await
        .map_err(ApiError::from)?;

    Ok(Response::OK(result))
}
