use utoipa::OpenApi;

use crate::application::http::{
    health::router::HealthApiDoc, ingredient_analysis::router::IngredientAnalysisApiDoc,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "AllerSafe API",
        description = "Ingredient allergen screening"
    ),
    nest(
        (path = "/health", api = HealthApiDoc),
    )
)]
pub struct ApiDoc;

/// Full document with every route prefixed by `root_path`.
pub fn build_openapi(root_path: &str) -> utoipa::openapi::OpenApi {
    let mut openapi = ApiDoc::openapi();
    openapi.merge(IngredientAnalysisApiDoc::openapi());

    let mut paths = openapi.paths.clone();
    paths.paths = openapi
        .paths
        .paths
        .into_iter()
        .map(|(path, item)| (format!("{root_path}{path}"), item))
        .collect();
    openapi.paths = paths;

    openapi
}
