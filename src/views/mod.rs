pub mod auth;
pub mod flash;
pub mod projects;

use askama::Template;
use axum::response::Html;
use axum::routing::{get, post};
use axum::Router;

use crate::error::AppError;
use crate::state::SharedState;

pub fn view_routes() -> Router<SharedState> {
    Router::new()
        // Auth views
        .route("/auth/login", get(auth::login_page).post(auth::login_submit))
        .route("/auth/register", get(auth::register_page).post(auth::register_submit))
        .route("/auth/logout", post(auth::logout_submit))
        // Projects
        .route("/", get(projects::index))
        .route("/projects", post(projects::create))
        .route("/projects/new", get(projects::new_page))
        .route("/projects/completed", get(projects::completed))
        .route("/projects/{id}", get(projects::show).post(projects::update))
        .route("/projects/{id}/edit", get(projects::edit_page))
        .route("/projects/{id}/complete", post(projects::complete))
        .route("/projects/{id}/delete", post(projects::delete))
        // Tasks & notes
        .route("/projects/{id}/tasks", post(projects::add_task))
        .route(
            "/projects/{id}/tasks/{task_id}/toggle",
            post(projects::toggle_task),
        )
        .route("/projects/{id}/notes", post(projects::add_note))
}

pub(crate) fn render(template: &impl Template) -> Result<Html<String>, AppError> {
    template
        .render()
        .map(Html)
        .map_err(|e| AppError::Internal(format!("Template render failed: {e}")))
}
