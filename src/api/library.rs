//! Read-only views over the synced store.

use axum::{Json, extract::State};
use std::sync::Arc;

use crate::api::{ApiError, ApiResponse, AppState, MediaDto};
use crate::db::StoreCounts;

/// `GET /api/counts`
pub async fn get_counts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<StoreCounts>>, ApiError> {
    let counts = state.store().counts().await?;
    Ok(Json(ApiResponse::success(counts)))
}

/// `GET /api/media`, ordered by display title.
pub async fn list_media(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<MediaDto>>>, ApiError> {
    let media = state
        .store()
        .list_media_by_title()
        .await?
        .into_iter()
        .map(MediaDto::from)
        .collect();

    Ok(Json(ApiResponse::success(media)))
}
