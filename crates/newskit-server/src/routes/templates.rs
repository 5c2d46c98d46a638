//! Template lookup endpoints

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use tracing::debug;

use newskit::TemplateSelect;

use crate::AppState;
use crate::error::Result;
use crate::models::{ApiResponse, TemplateSummary};

/// Create template routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{node_type}", get(list_templates_for_node_type))
        .route("/{node_type}/select", get(get_selection_element))
}

/// List the templates registered for a content subtype
pub async fn list_templates_for_node_type(
    State(state): State<AppState>,
    Path(node_type): Path<String>,
) -> Result<Json<ApiResponse<Vec<TemplateSummary>>>> {
    debug!("Listing templates for node type: {}", node_type);

    let templates = state.selection.templates_for_node_type(&node_type).await?;
    let summaries: Vec<TemplateSummary> = templates
        .into_values()
        .map(TemplateSummary::from)
        .collect();

    Ok(Json(ApiResponse::new(summaries)))
}

/// Selection element for a content subtype, ready for a form layer to render
pub async fn get_selection_element(
    State(state): State<AppState>,
    Path(node_type): Path<String>,
) -> Result<Json<ApiResponse<TemplateSelect>>> {
    debug!("Building template selection for node type: {}", node_type);

    let element = state.selection.selection_element(&node_type).await?;

    Ok(Json(ApiResponse::new(element)))
}
