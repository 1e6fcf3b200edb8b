use axum::{Json, extract::State};
use std::sync::Arc;
use tracing::info;

use crate::api::{ApiError, ApiResponse, AppState, SyncRequest};
use crate::db::LastSync;
use crate::services::SyncReport;

/// `GET /api/sync`: the last completed sync, if any.
pub async fn get_last_sync(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Option<LastSync>>>, ApiError> {
    let last = state.store().last_sync().await?;
    Ok(Json(ApiResponse::success(last)))
}

/// `POST /api/sync`: wipes the store and re-imports the user's list.
///
/// The sync runs on its own task holding the lock, so it finishes even if the
/// client goes away. Answers `409 Conflict` while another sync holds the lock.
pub async fn start_sync(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SyncRequest>,
) -> Result<Json<ApiResponse<SyncReport>>, ApiError> {
    let username = {
        let config = state.config().read().await;
        config
            .resolve_username(request.username.as_deref())
            .map_err(|e| ApiError::validation(e.to_string()))?
    };

    let Ok(guard) = state.shared.sync_lock.clone().try_lock_owned() else {
        return Err(ApiError::conflict("A sync is already running"));
    };

    info!(username = %username, "Sync requested over HTTP");
    let sync_service = state.shared.sync_service.clone();
    let task = tokio::spawn(async move {
        let _guard = guard;
        sync_service.sync(&username).await
    });

    let report = task
        .await
        .map_err(|e| ApiError::InternalError(format!("Sync task failed: {e}")))??;

    Ok(Json(ApiResponse::success(report)))
}
