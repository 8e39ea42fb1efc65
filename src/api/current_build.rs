//! Current build API endpoints.
//!
//! These drive the process-wide [`BuildStore`](crate::build::BuildStore) and
//! answer with the summary of the build after the change.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;

use super::{error, success, ApiResult};
use crate::build::BuildSummary;
use crate::errors::AppError;
use crate::models::{
    AddToBuildRequest, CreateBuildRequest, RemoveFromBuildQuery, SaveCurrentBuildRequest,
    SavedBuild,
};
use crate::AppState;

/// GET /api/build - Current build with totals and compatibility warnings.
pub async fn get_current_build(State(state): State<AppState>) -> ApiResult<BuildSummary> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);
    success(BuildSummary::new(state.build.snapshot()), revision_id)
}

/// POST /api/build/components - Put a catalog component into the build.
pub async fn add_to_build(
    State(state): State<AppState>,
    Json(request): Json<AddToBuildRequest>,
) -> ApiResult<BuildSummary> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let component = match state.repo.get_component(request.component_id).await {
        Ok(Some(component)) => component,
        Ok(None) => {
            return error(
                AppError::NotFound(format!("Component {} not found", request.component_id)),
                revision_id,
            )
        }
        Err(e) => return error(e, revision_id),
    };

    match state.build.add_component(&request.category, component) {
        Ok(()) => success(BuildSummary::new(state.build.snapshot()), revision_id),
        Err(e) => error(e.into(), revision_id),
    }
}

/// DELETE /api/build/components/:category - Remove from the build.
///
/// For accessories, `?id=` removes a single entry; without it all accessories
/// are removed.
pub async fn remove_from_build(
    State(state): State<AppState>,
    Path(category): Path<String>,
    Query(query): Query<RemoveFromBuildQuery>,
) -> ApiResult<BuildSummary> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.build.remove_component(&category, query.id) {
        Ok(()) => success(BuildSummary::new(state.build.snapshot()), revision_id),
        Err(e) => error(e.into(), revision_id),
    }
}

/// POST /api/build/reset - Empty the build.
pub async fn reset_build(State(state): State<AppState>) -> ApiResult<BuildSummary> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);
    state.build.reset_build();
    success(BuildSummary::new(state.build.snapshot()), revision_id)
}

/// POST /api/build/load/:id - Replace the build with a saved one.
pub async fn load_build(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<BuildSummary> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.build.load_build_by_id(&*state.repo, id).await {
        Ok(()) => success(BuildSummary::new(state.build.snapshot()), revision_id),
        Err(e) => error(e.into(), revision_id),
    }
}

/// POST /api/build/save - Save the current build's component ids.
pub async fn save_current_build(
    State(state): State<AppState>,
    Json(request): Json<SaveCurrentBuildRequest>,
) -> ApiResult<SavedBuild> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);
    let now = Utc::now();

    let name = match request.name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => format!("My Build {}", now.format("%Y-%m-%d %H:%M:%S")),
    };
    let create = CreateBuildRequest {
        name,
        created_at: Some(now.to_rfc3339()),
        component_ids: state.build.snapshot().component_ids(),
    };

    match state.repo.create_build(&create).await {
        Ok(build) => {
            tracing::info!(id = build.id, name = %build.name, "Saved current build");
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(build, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}
