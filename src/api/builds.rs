//! Saved build API endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{error, success, ApiResult};
use crate::errors::AppError;
use crate::models::{CreateBuildRequest, ResolvedBuild, SavedBuild, UpdateBuildRequest};
use crate::AppState;

/// GET /api/builds - List all saved builds.
pub async fn list_builds(State(state): State<AppState>) -> ApiResult<Vec<SavedBuild>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.list_builds().await {
        Ok(builds) => success(builds, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/builds/:id - Get a saved build with component ids.
pub async fn get_build(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<SavedBuild> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.get_build(id).await {
        Ok(Some(build)) => success(build, revision_id),
        Ok(None) => error(
            AppError::NotFound(format!("Build {} not found", id)),
            revision_id,
        ),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/builds/:id/with-components - Get a saved build with its components.
pub async fn get_build_with_components(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<ResolvedBuild> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.get_build_resolved(id).await {
        Ok(Some(build)) => success(build, revision_id),
        Ok(None) => error(
            AppError::NotFound(format!("Build {} not found", id)),
            revision_id,
        ),
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/builds - Save a build from component ids.
pub async fn create_build(
    State(state): State<AppState>,
    Json(request): Json<CreateBuildRequest>,
) -> ApiResult<SavedBuild> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    if request.name.trim().is_empty() {
        return error(
            AppError::Validation("Name is required".to_string()),
            revision_id,
        );
    }

    match state.repo.create_build(&request).await {
        Ok(build) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(build, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// PUT /api/builds/:id - Update a saved build.
pub async fn update_build(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateBuildRequest>,
) -> ApiResult<SavedBuild> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    if matches!(&request.name, Some(name) if name.trim().is_empty()) {
        return error(
            AppError::Validation("Name is required".to_string()),
            revision_id,
        );
    }

    match state.repo.update_build(id, &request).await {
        Ok(build) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(build, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// DELETE /api/builds/:id - Delete a saved build.
pub async fn delete_build(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<()> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.delete_build(id).await {
        Ok(true) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success((), new_revision)
        }
        Ok(false) => error(
            AppError::NotFound(format!("Build {} not found", id)),
            revision_id,
        ),
        Err(e) => error(e, revision_id),
    }
}
