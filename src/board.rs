//! Owner-scoped operations shared by the JSON API and the HTML views.
//!
//! Every function takes the caller's user id, so a project outside the
//! caller's set is indistinguishable from a missing one.

use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db;
use crate::error::AppError;
use crate::models::{Note, Project, Task};
use crate::validation::{self, ValidationErrors};

#[derive(Debug, Default, Clone, Deserialize)]
pub struct ProjectParams {
    pub name: Option<String>,
    pub description: Option<String>,
    pub due_on: Option<NaiveDate>,
}

impl ProjectParams {
    fn name(&self) -> &str {
        self.name.as_deref().map(str::trim).unwrap_or_default()
    }

    fn description(&self) -> Option<&str> {
        self.description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }
}

pub async fn find_project(pool: &PgPool, owner_id: Uuid, id: Uuid) -> Result<Project, AppError> {
    db::projects::find_by_id(pool, id, owner_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))
}

pub async fn create_project(
    pool: &PgPool,
    owner_id: Uuid,
    params: &ProjectParams,
) -> Result<Project, AppError> {
    validation::check_project_name(pool, owner_id, params.name.as_deref(), None)
        .await?
        .into_result()?;

    let project = db::projects::create(
        pool,
        owner_id,
        params.name(),
        params.description(),
        params.due_on,
    )
    .await
    .map_err(|e| AppError::unique_violation(e, db::projects::OWNER_NAME_KEY, "name"))?;

    tracing::info!(project_id = %project.id, %owner_id, "project created");
    Ok(project)
}

pub async fn update_project(
    pool: &PgPool,
    owner_id: Uuid,
    id: Uuid,
    params: &ProjectParams,
) -> Result<Project, AppError> {
    find_project(pool, owner_id, id).await?;

    validation::check_project_name(pool, owner_id, params.name.as_deref(), Some(id))
        .await?
        .into_result()?;

    let project = db::projects::update(
        pool,
        id,
        owner_id,
        params.name(),
        params.description(),
        params.due_on,
    )
    .await
    .map_err(|e| match e {
        sqlx::Error::RowNotFound => AppError::NotFound("Project not found".to_string()),
        e => AppError::unique_violation(e, db::projects::OWNER_NAME_KEY, "name"),
    })?;

    tracing::info!(project_id = %project.id, %owner_id, "project updated");
    Ok(project)
}

/// Move a project to completed. Safe to repeat.
pub async fn complete_project(pool: &PgPool, owner_id: Uuid, id: Uuid) -> Result<Project, AppError> {
    let project = db::projects::complete(pool, id, owner_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;

    tracing::info!(project_id = %project.id, %owner_id, "project completed");
    Ok(project)
}

pub async fn delete_project(pool: &PgPool, owner_id: Uuid, id: Uuid) -> Result<(), AppError> {
    if !db::projects::delete(pool, id, owner_id).await? {
        return Err(AppError::NotFound("Project not found".to_string()));
    }
    tracing::info!(project_id = %id, %owner_id, "project deleted");
    Ok(())
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct TaskParams {
    pub name: Option<String>,
    pub completed: Option<bool>,
}

pub async fn find_task(
    pool: &PgPool,
    owner_id: Uuid,
    project_id: Uuid,
    id: Uuid,
) -> Result<Task, AppError> {
    find_project(pool, owner_id, project_id).await?;
    db::tasks::find_by_id(pool, id, project_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".to_string()))
}

pub async fn create_task(
    pool: &PgPool,
    owner_id: Uuid,
    project_id: Uuid,
    params: &TaskParams,
) -> Result<Task, AppError> {
    let project = find_project(pool, owner_id, project_id).await?;

    let mut errors = ValidationErrors::new();
    validation::require_present(&mut errors, "name", params.name.as_deref());
    errors.into_result()?;

    let name = params.name.as_deref().map(str::trim).unwrap_or_default();
    let task = db::tasks::create(pool, project.id, name).await?;

    tracing::info!(task_id = %task.id, project_id = %project.id, "task created");
    Ok(task)
}

/// Apply the fields present in `params`; absent fields keep their value.
pub async fn update_task(
    pool: &PgPool,
    owner_id: Uuid,
    project_id: Uuid,
    id: Uuid,
    params: &TaskParams,
) -> Result<Task, AppError> {
    let existing = find_task(pool, owner_id, project_id, id).await?;

    if params.name.is_some() {
        let mut errors = ValidationErrors::new();
        validation::require_present(&mut errors, "name", params.name.as_deref());
        errors.into_result()?;
    }

    let name = params
        .name
        .as_deref()
        .map(str::trim)
        .unwrap_or(&existing.name);
    let completed = params.completed.unwrap_or(existing.completed);

    db::tasks::update(pool, id, project_id, name, completed)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".to_string()))
}

pub async fn toggle_task(
    pool: &PgPool,
    owner_id: Uuid,
    project_id: Uuid,
    id: Uuid,
) -> Result<Task, AppError> {
    find_project(pool, owner_id, project_id).await?;
    db::tasks::toggle(pool, id, project_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".to_string()))
}

pub async fn delete_task(
    pool: &PgPool,
    owner_id: Uuid,
    project_id: Uuid,
    id: Uuid,
) -> Result<(), AppError> {
    find_project(pool, owner_id, project_id).await?;
    if !db::tasks::delete(pool, id, project_id).await? {
        return Err(AppError::NotFound("Task not found".to_string()));
    }
    Ok(())
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct NoteParams {
    pub message: Option<String>,
}

pub async fn create_note(
    pool: &PgPool,
    owner_id: Uuid,
    project_id: Uuid,
    params: &NoteParams,
) -> Result<Note, AppError> {
    let project = find_project(pool, owner_id, project_id).await?;

    let mut errors = ValidationErrors::new();
    validation::require_present(&mut errors, "message", params.message.as_deref());
    errors.into_result()?;

    let message = params.message.as_deref().map(str::trim).unwrap_or_default();
    let note = db::notes::create(pool, project.id, message).await?;

    tracing::info!(note_id = %note.id, project_id = %project.id, "note created");
    Ok(note)
}

pub async fn delete_note(
    pool: &PgPool,
    owner_id: Uuid,
    project_id: Uuid,
    id: Uuid,
) -> Result<(), AppError> {
    find_project(pool, owner_id, project_id).await?;
    if !db::notes::delete(pool, id, project_id).await? {
        return Err(AppError::NotFound("Note not found".to_string()));
    }
    Ok(())
}
