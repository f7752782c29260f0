use allersafe_core::domain::ingredient_analysis::{
    entities::Verdict, ports::IngredientAnalysisService,
    value_objects::AnalyzeIngredientsInput,
};
use axum::extract::State;

use crate::application::{
    auth::RequiredIdentity,
    http::{
        ingredient_analysis::validators::AnalyzeIngredientsRequest,
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
    path = "/analyze-ingredients",
    tag = "ingredient-analysis",
    summary = "Analyze an ingredient list",
    description = "Screens an ingredient list against the caller's allergens. Uses the AI engine when available and the text matcher otherwise.",
    params(
        ("X-User-Id" = String, Header, description = "Authenticated user id"),
    ),
    request_body = AnalyzeIngredientsRequest,
    responses(
        (status = 200, body = Verdict),
        (status = 400, body = ApiErrorResponse),
        (status = 401, body = ApiErrorResponse),
        (status = 500, body = Verdict, description = "Stub verdict with UNKNOWN risk")
    )
)]
pub async fn analyze_ingredients(
    State(state): State<AppState>,
    RequiredIdentity(identity): RequiredIdentity,
    ValidateJson(payload): ValidateJson<AnalyzeIngredientsRequest>,
) -> Result<Response<Verdict>, ApiError> {
    let verdict = state
        .service
        .analyze_ingredients(identity, AnalyzeIngredientsInput::from(payload))
        .await
        .map_err(ApiError::from_analysis_error)?;

    Ok(Response::OK(verdict))
}
