use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Project;

/// Constraint backing per-owner name uniqueness.
pub const OWNER_NAME_KEY: &str = "projects_owner_name_key";

/// Projects still in progress, most recently created first.
pub async fn list_active(pool: &PgPool, owner_id: Uuid) -> Result<Vec<Project>, sqlx::Error> {
    list_by_completion(pool, owner_id, false).await
}

pub async fn list_completed(pool: &PgPool, owner_id: Uuid) -> Result<Vec<Project>, sqlx::Error> {
    list_by_completion(pool, owner_id, true).await
}

async fn list_by_completion(
    pool: &PgPool,
    owner_id: Uuid,
    completed: bool,
) -> Result<Vec<Project>, sqlx::Error> {
    sqlx::query_as::<_, Project>(
        "SELECT * FROM projects WHERE owner_id = $1 AND completed = $2
         ORDER BY created_at DESC",
    )
    .bind(owner_id)
    .bind(completed)
    .fetch_all(pool)
    .await
}

pub async fn create(
    pool: &PgPool,
    owner_id: Uuid,
    name: &str,
    description: Option<&str>,
    due_on: Option<NaiveDate>,
) -> Result<Project, sqlx::Error> {
    sqlx::query_as::<_, Project>(
        "INSERT INTO projects (owner_id, name, description, due_on)
         VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(owner_id)
    .bind(name)
    .bind(description)
    .bind(due_on)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(
    pool: &PgPool,
    id: Uuid,
    owner_id: Uuid,
) -> Result<Option<Project>, sqlx::Error> {
    sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = $1 AND owner_id = $2")
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await
}

/// Whether `owner_id` already has a project called `name`, ignoring `except`.
pub async fn name_taken(
    pool: &PgPool,
    owner_id: Uuid,
    name: &str,
    except: Option<Uuid>,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (
             SELECT 1 FROM projects
             WHERE owner_id = $1 AND name = $2 AND ($3::uuid IS NULL OR id <> $3)
         )",
    )
    .bind(owner_id)
    .bind(name)
    .bind(except)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    owner_id: Uuid,
    name: &str,
    description: Option<&str>,
    due_on: Option<NaiveDate>,
) -> Result<Project, sqlx::Error> {
    sqlx::query_as::<_, Project>(
        "UPDATE projects SET name = $3, description = $4, due_on = $5, updated_at = now()
         WHERE id = $1 AND owner_id = $2 RETURNING *",
    )
    .bind(id)
    .bind(owner_id)
    .bind(name)
    .bind(description)
    .bind(due_on)
    .fetch_one(pool)
    .await
}

/// Mark a project completed. Completing an already completed project is a no-op
/// that still returns the row.
pub async fn complete(
    pool: &PgPool,
    id: Uuid,
    owner_id: Uuid,
) -> Result<Option<Project>, sqlx::Error> {
    sqlx::query_as::<_, Project>(
        "UPDATE projects
         SET completed = true,
             updated_at = CASE WHEN completed THEN updated_at ELSE now() END
         WHERE id = $1 AND owner_id = $2 RETURNING *",
    )
    .bind(id)
    .bind(owner_id)
    .fetch_optional(pool)
    .await
}

/// Delete a project with its tasks and notes. Returns false if nothing matched.
pub async fn delete(pool: &PgPool, id: Uuid, owner_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM projects WHERE id = $1 AND owner_id = $2")
        .bind(id)
        .bind(owner_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
