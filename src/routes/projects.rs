use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::board::{self, ProjectParams};
use crate::db;
use crate::error::AppError;
use crate::models::project::today;
use crate::models::ProjectView;
use crate::state::SharedState;

/// Active (not completed) projects of the caller.
pub async fn list(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<ProjectView>>, AppError> {
    let projects = db::projects::list_active(&state.pool, auth.user_id).await?;
    let today = today();
    Ok(Json(projects.into_iter().map(|p| p.view(today)).collect()))
}

pub async fn list_completed(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<ProjectView>>, AppError> {
    let projects = db::projects::list_completed(&state.pool, auth.user_id).await?;
    let today = today();
    Ok(Json(projects.into_iter().map(|p| p.view(today)).collect()))
}

pub async fn create(
    auth: AuthUser,
    State(state): State<SharedState>,
    Json(req): Json<ProjectParams>,
) -> Result<Json<ProjectView>, AppError> {
    let project = board::create_project(&state.pool, auth.user_id, &req).await?;
    Ok(Json(project.view(today())))
}

pub async fn get(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProjectView>, AppError> {
    let project = board::find_project(&state.pool, auth.user_id, id).await?;
    Ok(Json(project.view(today())))
}

pub async fn update(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ProjectParams>,
) -> Result<Json<ProjectView>, AppError> {
    let project = board::update_project(&state.pool, auth.user_id, id, &req).await?;
    Ok(Json(project.view(today())))
}

pub async fn complete(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProjectView>, AppError> {
    let project = board::complete_project(&state.pool, auth.user_id, id).await?;
    Ok(Json(project.view(today())))
}

pub async fn delete(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    board::delete_project(&state.pool, auth.user_id, id).await?;
    Ok(Json(serde_json::json!({ "message": "Deleted" })))
}
