//! Component catalog API endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use super::{error, success, ApiResult};
use crate::catalog::ComponentQuery;
use crate::errors::AppError;
use crate::models::{Component, CreateComponentRequest, UpdateComponentRequest};
use crate::AppState;

/// GET /api/components - List components, filtered and sorted by the query.
pub async fn list_components(
    State(state): State<AppState>,
    Query(query): Query<ComponentQuery>,
) -> ApiResult<Vec<Component>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let category = match query.category() {
        Ok(category) => category,
        Err(e) => return error(e, revision_id),
    };

    match state.repo.list_components(category).await {
        Ok(components) => success(query.apply(components), revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/components/:id - Get a single component.
pub async fn get_component(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Component> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.get_component(id).await {
        Ok(Some(component)) => success(component, revision_id),
        Ok(None) => error(
            AppError::NotFound(format!("Component {} not found", id)),
            revision_id,
        ),
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/components - Create a new component.
pub async fn create_component(
    State(state): State<AppState>,
    Json(request): Json<CreateComponentRequest>,
) -> ApiResult<Component> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    if let Err(e) = request.validate() {
        return error(e, revision_id);
    }

    match state.repo.create_component(&request).await {
        Ok(component) => {
            tracing::info!(id = component.id, category = %component.category, "Created component");
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(component, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// PUT /api/components/:id - Update a component.
pub async fn update_component(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateComponentRequest>,
) -> ApiResult<Component> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.update_component(id, &request).await {
        Ok(component) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(component, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// DELETE /api/components/:id - Delete a component.
pub async fn delete_component(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<()> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.delete_component(id).await {
        Ok(true) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success((), new_revision)
        }
        Ok(false) => error(
            AppError::NotFound(format!("Component {} not found", id)),
            revision_id,
        ),
        Err(e) => error(e, revision_id),
    }
}
