use askama::Template;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use axum_extra::extract::CookieJar;
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::board::{self, NoteParams, ProjectParams, TaskParams};
use crate::db;
use crate::error::AppError;
use crate::models::project::today;
use crate::models::{Note, Project, Task};
use crate::state::SharedState;
use crate::validation::ValidationErrors;
use crate::views::flash::{self, Notice};
use crate::views::render;

struct ProjectRow {
    id: String,
    name: String,
    due_on: Option<String>,
    late: bool,
    task_count: i64,
}

#[derive(Template)]
#[template(path = "projects/index.html")]
struct IndexTemplate {
    user_name: String,
    notice: Option<String>,
    projects: Vec<ProjectRow>,
}

#[derive(Template)]
#[template(path = "projects/completed.html")]
struct CompletedTemplate {
    user_name: String,
    projects: Vec<ProjectRow>,
}

#[derive(Template)]
#[template(path = "projects/new.html")]
struct NewTemplate {
    user_name: String,
    form: ProjectForm,
    errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "projects/edit.html")]
struct EditTemplate {
    user_name: String,
    project_id: String,
    form: ProjectForm,
    errors: Vec<String>,
}

struct TaskRow {
    id: String,
    name: String,
    completed: bool,
}

struct NoteRow {
    message: String,
    created_at: String,
}

#[derive(Template)]
#[template(path = "projects/show.html")]
struct ShowTemplate {
    user_name: String,
    notice: Option<String>,
    errors: Vec<String>,
    id: String,
    name: String,
    description: Option<String>,
    due_on: Option<String>,
    late: bool,
    completed: bool,
    tasks: Vec<TaskRow>,
    notes: Vec<NoteRow>,
}

/// Browser form for creating and editing a project. Every field arrives as text.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ProjectForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub due_on: String,
}

impl ProjectForm {
    fn from_project(project: &Project) -> Self {
        Self {
            name: project.name.clone(),
            description: project.description.clone().unwrap_or_default(),
            due_on: project.due_on.map(format_date).unwrap_or_default(),
        }
    }

    fn params(&self) -> Result<ProjectParams, ValidationErrors> {
        let due_on = match self.due_on.trim() {
            "" => None,
            raw => Some(
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .map_err(|_| ValidationErrors::single("due_on", "is invalid"))?,
            ),
        };
        Ok(ProjectParams {
            name: Some(self.name.clone()),
            description: Some(self.description.clone()),
            due_on,
        })
    }
}

#[derive(Deserialize)]
pub struct TaskForm {
    #[serde(default)]
    pub name: String,
}

#[derive(Deserialize)]
pub struct NoteForm {
    #[serde(default)]
    pub message: String,
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

async fn project_rows(
    state: &SharedState,
    projects: Vec<Project>,
) -> Result<Vec<ProjectRow>, AppError> {
    let today = today();
    let mut rows = Vec::with_capacity(projects.len());
    for project in projects {
        let task_count = db::tasks::count_by_project(&state.pool, project.id).await?;
        rows.push(ProjectRow {
            id: project.id.to_string(),
            late: project.is_late(today),
            due_on: project.due_on.map(format_date),
            name: project.name,
            task_count,
        });
    }
    Ok(rows)
}

async fn render_show(
    state: &SharedState,
    user_name: String,
    project: Project,
    notice: Option<String>,
    errors: Vec<String>,
) -> Result<ShowTemplate, AppError> {
    let tasks: Vec<Task> = db::tasks::list_by_project(&state.pool, project.id).await?;
    let notes: Vec<Note> = db::notes::list_by_project(&state.pool, project.id).await?;

    Ok(ShowTemplate {
        user_name,
        notice,
        errors,
        id: project.id.to_string(),
        late: project.is_late(today()),
        completed: project.is_completed(),
        due_on: project.due_on.map(format_date),
        name: project.name,
        description: project.description,
        tasks: tasks
            .into_iter()
            .map(|t| TaskRow {
                id: t.id.to_string(),
                name: t.name,
                completed: t.completed,
            })
            .collect(),
        notes: notes
            .into_iter()
            .map(|n| NoteRow {
                message: n.message,
                created_at: n.created_at.format("%Y-%m-%d %H:%M").to_string(),
            })
            .collect(),
    })
}

fn project_path(id: Uuid) -> String {
    format!("/projects/{id}")
}

pub async fn index(
    auth: AuthUser,
    State(state): State<SharedState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    let user = auth.user(&state.pool).await?;
    let projects = db::projects::list_active(&state.pool, user.id).await?;
    let (jar, notice) = flash::take(jar);

    let template = IndexTemplate {
        user_name: user.name(),
        notice,
        projects: project_rows(&state, projects).await?,
    };
    Ok((jar, render(&template)?))
}

pub async fn completed(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<impl IntoResponse, AppError> {
    let user = auth.user(&state.pool).await?;
    let projects = db::projects::list_completed(&state.pool, user.id).await?;

    let template = CompletedTemplate {
        user_name: user.name(),
        projects: project_rows(&state, projects).await?,
    };
    render(&template)
}

pub async fn new_page(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<impl IntoResponse, AppError> {
    let user = auth.user(&state.pool).await?;
    let template = NewTemplate {
        user_name: user.name(),
        form: ProjectForm::default(),
        errors: Vec::new(),
    };
    render(&template)
}

pub async fn create(
    auth: AuthUser,
    State(state): State<SharedState>,
    jar: CookieJar,
    Form(form): Form<ProjectForm>,
) -> Result<Response, AppError> {
    let user = auth.user(&state.pool).await?;

    let result = match form.params() {
        Ok(params) => board::create_project(&state.pool, user.id, &params).await,
        Err(errors) => Err(AppError::Validation(errors)),
    };

    match result {
        Ok(project) => {
            let jar = flash::set(jar, Notice::ProjectCreated);
            Ok((jar, Redirect::to(&project_path(project.id))).into_response())
        }
        Err(AppError::Validation(errors)) => {
            let template = NewTemplate {
                user_name: user.name(),
                form,
                errors: errors.full_messages(),
            };
            Ok((StatusCode::UNPROCESSABLE_ENTITY, render(&template)?).into_response())
        }
        Err(e) => Err(e),
    }
}

pub async fn show(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    let user = auth.user(&state.pool).await?;
    let project = board::find_project(&state.pool, user.id, id).await?;
    let (jar, notice) = flash::take(jar);

    let template = render_show(&state, user.name(), project, notice, Vec::new()).await?;
    Ok((jar, render(&template)?))
}

pub async fn edit_page(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let user = auth.user(&state.pool).await?;
    let project = board::find_project(&state.pool, user.id, id).await?;

    let template = EditTemplate {
        user_name: user.name(),
        project_id: project.id.to_string(),
        form: ProjectForm::from_project(&project),
        errors: Vec::new(),
    };
    render(&template)
}

pub async fn update(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    jar: CookieJar,
    Form(form): Form<ProjectForm>,
) -> Result<Response, AppError> {
    let user = auth.user(&state.pool).await?;

    let result = match form.params() {
        Ok(params) => board::update_project(&state.pool, user.id, id, &params).await,
        Err(errors) => Err(AppError::Validation(errors)),
    };

    match result {
        Ok(project) => {
            let jar = flash::set(jar, Notice::ProjectUpdated);
            Ok((jar, Redirect::to(&project_path(project.id))).into_response())
        }
        Err(AppError::Validation(errors)) => {
            let template = EditTemplate {
                user_name: user.name(),
                project_id: id.to_string(),
                form,
                errors: errors.full_messages(),
            };
            Ok((StatusCode::UNPROCESSABLE_ENTITY, render(&template)?).into_response())
        }
        Err(e) => Err(e),
    }
}

pub async fn complete(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Redirect, AppError> {
    let project = board::complete_project(&state.pool, auth.user_id, id).await?;
    Ok(Redirect::to(&project_path(project.id)))
}

pub async fn delete(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    board::delete_project(&state.pool, auth.user_id, id).await?;
    let jar = flash::set(jar, Notice::ProjectDeleted);
    Ok((jar, Redirect::to("/")))
}

pub async fn add_task(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    jar: CookieJar,
    Form(form): Form<TaskForm>,
) -> Result<Response, AppError> {
    let params = TaskParams {
        name: Some(form.name),
        completed: None,
    };
    match board::create_task(&state.pool, auth.user_id, id, &params).await {
        Ok(task) => {
            let jar = flash::set(jar, Notice::TaskAdded);
            Ok((jar, Redirect::to(&project_path(task.project_id))).into_response())
        }
        Err(AppError::Validation(errors)) => rerender_show(&state, &auth, id, errors).await,
        Err(e) => Err(e),
    }
}

pub async fn toggle_task(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path((id, task_id)): Path<(Uuid, Uuid)>,
) -> Result<Redirect, AppError> {
    let task = board::toggle_task(&state.pool, auth.user_id, id, task_id).await?;
    Ok(Redirect::to(&project_path(task.project_id)))
}

pub async fn add_note(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    jar: CookieJar,
    Form(form): Form<NoteForm>,
) -> Result<Response, AppError> {
    let params = NoteParams {
        message: Some(form.message),
    };
    match board::create_note(&state.pool, auth.user_id, id, &params).await {
        Ok(note) => {
            let jar = flash::set(jar, Notice::NoteAdded);
            Ok((jar, Redirect::to(&project_path(note.project_id))).into_response())
        }
        Err(AppError::Validation(errors)) => rerender_show(&state, &auth, id, errors).await,
        Err(e) => Err(e),
    }
}

async fn rerender_show(
    state: &SharedState,
    auth: &AuthUser,
    id: Uuid,
    errors: ValidationErrors,
) -> Result<Response, AppError> {
    let user = auth.user(&state.pool).await?;
    let project = board::find_project(&state.pool, user.id, id).await?;
    let template = render_show(state, user.name(), project, None, errors.full_messages()).await?;
    Ok((StatusCode::UNPROCESSABLE_ENTITY, render(&template)?).into_response())
}
