use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Task;

pub async fn list_by_project(pool: &PgPool, project_id: Uuid) -> Result<Vec<Task>, sqlx::Error> {
    sqlx::query_as::<_, Task>(
        "SELECT * FROM tasks WHERE project_id = $1 ORDER BY created_at ASC",
    )
    .bind(project_id)
    .fetch_all(pool)
    .await
}

pub async fn count_by_project(pool: &PgPool, project_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tasks WHERE project_id = $1")
        .bind(project_id)
        .fetch_one(pool)
        .await
}

pub async fn create(pool: &PgPool, project_id: Uuid, name: &str) -> Result<Task, sqlx::Error> {
    sqlx::query_as::<_, Task>(
        "INSERT INTO tasks (project_id, name) VALUES ($1, $2) RETURNING *",
    )
    .bind(project_id)
    .bind(name)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(
    pool: &PgPool,
    id: Uuid,
    project_id: Uuid,
) -> Result<Option<Task>, sqlx::Error> {
    sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = $1 AND project_id = $2")
        .bind(id)
        .bind(project_id)
        .fetch_optional(pool)
        .await
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    project_id: Uuid,
    name: &str,
    completed: bool,
) -> Result<Option<Task>, sqlx::Error> {
    sqlx::query_as::<_, Task>(
        "UPDATE tasks SET name = $3, completed = $4, updated_at = now()
         WHERE id = $1 AND project_id = $2 RETURNING *",
    )
    .bind(id)
    .bind(project_id)
    .bind(name)
    .bind(completed)
    .fetch_optional(pool)
    .await
}

pub async fn toggle(
    pool: &PgPool,
    id: Uuid,
    project_id: Uuid,
) -> Result<Option<Task>, sqlx::Error> {
    sqlx::query_as::<_, Task>(
        "UPDATE tasks SET completed = NOT completed, updated_at = now()
         WHERE id = $1 AND project_id = $2 RETURNING *",
    )
    .bind(id)
    .bind(project_id)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: Uuid, project_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND project_id = $2")
        .bind(id)
        .bind(project_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
