pub mod auth;
pub mod notes;
pub mod projects;
pub mod tasks;

use axum::routing::{get, post};
use axum::Router;

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Auth
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/refresh", post(auth::refresh))
        .route("/api/v1/auth/logout", post(auth::logout))
        .route("/api/v1/auth/me", get(auth::me))
        // Projects
        .route("/api/v1/projects", get(projects::list).post(projects::create))
        .route("/api/v1/projects/completed", get(projects::list_completed))
        .route(
            "/api/v1/projects/{id}",
            get(projects::get)
                .put(projects::update)
                .delete(projects::delete),
        )
        .route("/api/v1/projects/{id}/complete", post(projects::complete))
        // Tasks
        .route(
            "/api/v1/projects/{project_id}/tasks",
            get(tasks::list).post(tasks::create),
        )
        .route(
            "/api/v1/projects/{project_id}/tasks/{id}",
            get(tasks::show).put(tasks::update).delete(tasks::delete),
        )
        // Notes
        .route(
            "/api/v1/projects/{project_id}/notes",
            get(notes::list).post(notes::create),
        )
        .route(
            "/api/v1/projects/{project_id}/notes/{id}",
            axum::routing::delete(notes::delete),
        )
}
