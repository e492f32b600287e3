use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub project_id: Uuid,
    pub message: String,
    pub created_at: DateTime<Utc>,
}
