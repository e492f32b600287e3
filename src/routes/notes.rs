use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::board::{self, NoteParams};
use crate::db;
use crate::error::AppError;
use crate::models::Note;
use crate::state::SharedState;

pub async fn list(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(project_id): Path<Uuid>,
) -> Result<Json<Vec<Note>>, AppError> {
    let project = board::find_project(&state.pool, auth.user_id, project_id).await?;
    let notes = db::notes::list_by_project(&state.pool, project.id).await?;
    Ok(Json(notes))
}

pub async fn create(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(project_id): Path<Uuid>,
    Json(req): Json<NoteParams>,
) -> Result<Json<Note>, AppError> {
    let note = board::create_note(&state.pool, auth.user_id, project_id, &req).await?;
    Ok(Json(note))
}

pub async fn delete(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path((project_id, id)): Path<(Uuid, Uuid)>,
) -> Result<Json<serde_json::Value>, AppError> {
    board::delete_note(&state.pool, auth.user_id, project_id, id).await?;
    Ok(Json(serde_json::json!({ "message": "Deleted" })))
}
