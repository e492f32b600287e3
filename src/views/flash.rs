//! One-shot notices carried across a redirect in a short-lived cookie.

use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::CookieJar;

const COOKIE: &str = "flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    ProjectCreated,
    ProjectUpdated,
    ProjectDeleted,
    TaskAdded,
    NoteAdded,
}

impl Notice {
    fn key(self) -> &'static str {
        match self {
            Notice::ProjectCreated => "project_created",
            Notice::ProjectUpdated => "project_updated",
            Notice::ProjectDeleted => "project_deleted",
            Notice::TaskAdded => "task_added",
            Notice::NoteAdded => "note_added",
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        match key {
            "project_created" => Some(Notice::ProjectCreated),
            "project_updated" => Some(Notice::ProjectUpdated),
            "project_deleted" => Some(Notice::ProjectDeleted),
            "task_added" => Some(Notice::TaskAdded),
            "note_added" => Some(Notice::NoteAdded),
            _ => None,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Notice::ProjectCreated => "Project was successfully created.",
            Notice::ProjectUpdated => "Project was successfully updated.",
            Notice::ProjectDeleted => "Project was successfully deleted.",
            Notice::TaskAdded => "Task was successfully created.",
            Notice::NoteAdded => "Note was successfully created.",
        }
    }
}

pub fn set(jar: CookieJar, notice: Notice) -> CookieJar {
    let cookie = Cookie::build((COOKIE, notice.key()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    jar.add(cookie)
}

/// Read and clear the pending notice.
pub fn take(jar: CookieJar) -> (CookieJar, Option<String>) {
    let notice = jar
        .get(COOKIE)
        .and_then(|c| Notice::from_key(c.value()))
        .map(|n| n.message().to_string());
    let jar = if jar.get(COOKIE).is_some() {
        jar.remove(Cookie::build(COOKIE).path("/"))
    } else {
        jar
    };
    (jar, notice)
}
