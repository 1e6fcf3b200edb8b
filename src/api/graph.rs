use axum::{
    Json,
    extract::{Path, Query, State},
};
use std::sync::Arc;

use crate::api::{ApiError, ApiResponse, AppState, GraphQuery, SearchQuery, SearchResultDto};
use crate::graph::{GraphData, ResolveOptions};

/// `GET /api/graph/{root}`
///
/// A root that is not a numeric media id, or that is not in the store,
/// resolves to an empty graph.
pub async fn get_graph(
    State(state): State<Arc<AppState>>,
    Path(root): Path<String>,
    Query(query): Query<GraphQuery>,
) -> Result<Json<ApiResponse<GraphData>>, ApiError> {
    let resolution = state.resolver().resolve_str(&root, query.into()).await?;
    Ok(Json(ApiResponse::success(resolution.graph)))
}

/// `GET /api/graph/{root}/search?q=`: node ids in the root's graph whose
/// names match `q`, best first.
pub async fn search_graph(
    State(state): State<Arc<AppState>>,
    Path(root): Path<String>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<SearchResultDto>>, ApiError> {
    let options = ResolveOptions {
        hide_root: query.hide_root,
        hide_media: query.hide_media,
    };
    let resolution = state.resolver().resolve_str(&root, options).await?;
    let ids = resolution.search(&query.q);

    Ok(Json(ApiResponse::success(SearchResultDto {
        query: query.q,
        ids,
    })))
}
