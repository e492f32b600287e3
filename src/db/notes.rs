use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Note;

pub async fn list_by_project(pool: &PgPool, project_id: Uuid) -> Result<Vec<Note>, sqlx::Error> {
    sqlx::query_as::<_, Note>(
        "SELECT * FROM notes WHERE project_id = $1 ORDER BY created_at DESC",
    )
    .bind(project_id)
    .fetch_all(pool)
    .await
}

pub async fn create(pool: &PgPool, project_id: Uuid, message: &str) -> Result<Note, sqlx::Error> {
    sqlx::query_as::<_, Note>(
        "INSERT INTO notes (project_id, message) VALUES ($1, $2) RETURNING *",
    )
    .bind(project_id)
    .bind(message)
    .fetch_one(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: Uuid, project_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM notes WHERE id = $1 AND project_id = $2")
        .bind(id)
        .bind(project_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
