use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::board::{self, TaskParams};
use crate::db;
use crate::error::AppError;
use crate::models::Task;
use crate::state::SharedState;

pub async fn list(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(project_id): Path<Uuid>,
) -> Result<Json<Vec<Task>>, AppError> {
    let project = board::find_project(&state.pool, auth.user_id, project_id).await?;
    let tasks = db::tasks::list_by_project(&state.pool, project.id).await?;
    Ok(Json(tasks))
}

pub async fn create(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(project_id): Path<Uuid>,
    Json(req): Json<TaskParams>,
) -> Result<Json<Task>, AppError> {
    let task = board::create_task(&state.pool, auth.user_id, project_id, &req).await?;
    Ok(Json(task))
}

pub async fn show(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path((project_id, id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Task>, AppError> {
    let task = board::find_task(&state.pool, auth.user_id, project_id, id).await?;
    Ok(Json(task))
}

pub async fn update(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path((project_id, id)): Path<(Uuid, Uuid)>,
    Json(req): Json<TaskParams>,
) -> Result<Json<Task>, AppError> {
    let task = board::update_task(&state.pool, auth.user_id, project_id, id, &req).await?;
    Ok(Json(task))
}

pub async fn delete(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path((project_id, id)): Path<(Uuid, Uuid)>,
) -> Result<Json<serde_json::Value>, AppError> {
    board::delete_task(&state.pool, auth.user_id, project_id, id).await?;
    Ok(Json(serde_json::json!({ "message": "Deleted" })))
}
