use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub due_on: Option<NaiveDate>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Lifecycle of a project. Completion is one-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Active,
    Completed,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Completed => "completed",
        }
    }
}

impl Project {
    /// A project is late when its due date is strictly before `today`.
    pub fn is_late(&self, today: NaiveDate) -> bool {
        self.due_on.is_some_and(|due| due < today)
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn status(&self) -> ProjectStatus {
        if self.completed {
            ProjectStatus::Completed
        } else {
            ProjectStatus::Active
        }
    }

    /// Snapshot with derived fields evaluated against `today`.
    pub fn view(self, today: NaiveDate) -> ProjectView {
        ProjectView {
            late: self.is_late(today),
            status: self.status(),
            project: self,
        }
    }
}

/// API representation of a project, including the derived `late` and `status`.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectView {
    #[serde(flatten)]
    pub project: Project,
    pub late: bool,
    pub status: ProjectStatus,
}

/// The current calendar date used for lateness checks.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}
