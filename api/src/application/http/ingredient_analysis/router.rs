use axum::{
    Router,
    routing::{get, post},
};
use utoipa::OpenApi;

use super::handlers::{
    analyze_ingredients::{__path_analyze_ingredients, analyze_ingredients},
    get_scan::{__path_get_scan, get_scan},
    get_scan_history::{__path_get_scan_history, get_scan_history},
    quick_check::{__path_quick_check, quick_check},
};
use crate::application::http::server::app_state::AppState;

#[derive(OpenApi)]
#[openapi(paths(analyze_ingredients, quick_check, get_scan_history, get_scan))]
pub struct IngredientAnalysisApiDoc;

pub fn ingredient_analysis_routes(state: AppState) -> Router<AppState> {
    let root_path = &state.args.server.root_path;

    Router::new()
        .route(
            &format!("{}/analyze-ingredients", root_path),
            post(analyze_ingredients),
        )
        .route(&format!("{}/quick-check", root_path), post(quick_check))
        .route(&format!("{}/scans", root_path), get(get_scan_history))
        .route(&format!("{}/scans/{{scan_id}}", root_path), get(get_scan))
}
