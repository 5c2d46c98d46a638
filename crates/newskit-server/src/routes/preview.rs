//! Preview archive endpoint

use axum::{
    Router,
    body::Body,
    extract::{Path, State},
    http::header,
    response::Response,
    routing::get,
};
use tracing::debug;

use newskit::EntityId;

use crate::AppState;
use crate::error::Result;

/// Create preview routes
pub fn router() -> Router<AppState> {
    Router::new().route("/{entity_type}/{entity_id}/{revision_id}", get(get_preview))
}

/// Build a preview archive for one entity revision and deliver it as a download
#[axum::debug_handler]
pub async fn get_preview(
    State(state): State<AppState>,
    Path((entity_type, entity_id, revision_id)): Path<(String, String, String)>,
) -> Result<Response<Body>> {
    debug!(
        "Preview requested for {}/{} revision {}",
        entity_type, entity_id, revision_id
    );

    let entity_id = EntityId::from(entity_id);
    let entity = state
        .content
        .load_entity(&entity_type, &entity_id, &revision_id)
        .await?;

    let archive = state.preview.preview(&entity)?;

    Ok(Response::builder()
        .header(header::CONTENT_TYPE, "application/zip")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename={}", archive.filename),
        )
        .body(Body::from(archive.bytes))
        .unwrap())
}
