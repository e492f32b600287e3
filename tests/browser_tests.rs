mod common;

use reqwest::StatusCode;
use serde_json::json;

const JOE: &str = "joetester@example.com";

async fn page(browser: &reqwest::Client, url: String) -> (StatusCode, String) {
    let resp = browser.get(url).send().await.unwrap();
    (resp.status(), resp.text().await.unwrap())
}

#[tokio::test]
async fn anonymous_visitors_are_sent_to_login() {
    let app = common::spawn_app().await;

    let resp = app.client.get(app.url("/")).send().await.unwrap();
    assert!(resp.status().is_redirection());
    assert_eq!(resp.headers()["location"], "/auth/login");

    let resp = app.client.get(app.url("/auth/login")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().contains("Sign in"));

    common::cleanup(app).await;
}

#[tokio::test]
async fn user_signs_up_through_the_form() {
    let app = common::spawn_app().await;
    let browser = reqwest::Client::builder().cookie_store(true).build().unwrap();

    let resp = browser
        .post(app.url("/auth/register"))
        .form(&[
            ("first_name", "Joe"),
            ("last_name", "Tester"),
            ("email", JOE),
            ("password", common::PASSWORD),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.url().path(), "/");
    assert!(resp.text().await.unwrap().contains("Joe Tester"));

    common::cleanup(app).await;
}

#[tokio::test]
async fn wrong_password_rerenders_login() {
    let app = common::spawn_app().await;
    app.sign_up_joe().await;

    let resp = app
        .client
        .post(app.url("/auth/login"))
        .form(&[("email", JOE), ("password", "wrongpassword")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(resp.text().await.unwrap().contains("Invalid credentials"));

    common::cleanup(app).await;
}

#[tokio::test]
async fn user_creates_a_new_project() {
    let app = common::spawn_app().await;
    app.sign_up_joe().await;
    let browser = app.browser(JOE).await;

    let (_, home) = page(&browser, app.url("/")).await;
    assert!(home.contains("New Project"));
    let (_, form) = page(&browser, app.url("/projects/new")).await;
    assert!(form.contains("Name"));
    assert!(form.contains("Description"));
    assert!(form.contains("Create Project"));

    let before = app.project_count(JOE).await;
    let resp = browser
        .post(app.url("/projects"))
        .form(&[("name", "Test Project"), ("description", "Trying out the forms")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();

    assert_eq!(app.project_count(JOE).await, before + 1);
    assert!(body.contains("Project was successfully created"));
    assert!(body.contains("Test Project"));
    assert!(body.contains("Owner: Joe Tester"));

    common::cleanup(app).await;
}

#[tokio::test]
async fn blank_project_name_rerenders_the_form() {
    let app = common::spawn_app().await;
    app.sign_up_joe().await;
    let browser = app.browser(JOE).await;

    let resp = browser
        .post(app.url("/projects"))
        .form(&[("name", ""), ("description", "No name")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = resp.text().await.unwrap();
    // The apostrophe in "can't" comes back HTML-escaped
    assert!(body.contains("be blank"));
    assert!(body.contains("No name"));
    assert_eq!(app.project_count(JOE).await, 0);

    common::cleanup(app).await;
}

#[tokio::test]
async fn edit_project() {
    let app = common::spawn_app().await;
    let token = app.sign_up_joe().await;
    let project = app.create_project(&token, &json!({ "name": "Test Project" })).await;
    let id = project["id"].as_str().unwrap();
    let browser = app.browser(JOE).await;

    let (_, home) = page(&browser, app.url("/")).await;
    assert!(home.contains(&format!("href=\"/projects/{id}\"")));
    assert!(home.contains("Test Project"));

    let (status, show) = page(&browser, app.url(&format!("/projects/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(show.contains("Test Project"));
    assert!(show.contains("Owner: Joe Tester"));
    assert!(show.contains(&format!("href=\"/projects/{id}/edit\">Edit</a>")));

    let resp = browser
        .post(app.url(&format!("/projects/{id}")))
        .form(&[("name", "Renamed Project"), ("description", ""), ("due_on", "")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Project was successfully updated"));
    assert!(body.contains("Renamed Project"));

    common::cleanup(app).await;
}

#[tokio::test]
async fn user_completes_a_project() {
    let app = common::spawn_app().await;
    let token = app.sign_up_joe().await;
    let project = app.create_project(&token, &json!({ "name": "Test Project" })).await;
    let id = project["id"].as_str().unwrap();
    let browser = app.browser(JOE).await;

    let (_, before) = page(&browser, app.url(&format!("/projects/{id}"))).await;
    assert!(!before.contains("Completed"));
    assert!(before.contains(">Complete</button>"));

    let resp = browser
        .post(app.url(&format!("/projects/{id}/complete")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let after = resp.text().await.unwrap();

    let completed: bool = sqlx::query_scalar::<_, bool>("SELECT completed FROM projects WHERE id = $1")
        .bind(id.parse::<uuid::Uuid>().unwrap())
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert!(completed);
    assert!(after.contains("Congratulations, this project is complete!"));
    assert!(after.contains("Completed"));
    assert!(!after.contains(">Complete</button>"));

    common::cleanup(app).await;
}

#[tokio::test]
async fn completed_projects_move_to_their_own_listing() {
    let app = common::spawn_app().await;
    let joe = app.sign_up_joe().await;
    let jane = app.sign_up("Jane", "Tester", "janetester@example.com").await;
    app.create_project(&joe, &json!({ "name": "Still Going" })).await;
    let done = app.create_project(&joe, &json!({ "name": "All Wrapped Up" })).await;
    let janes = app.create_project(&jane, &json!({ "name": "Jane Finished" })).await;
    let browser = app.browser(JOE).await;

    let done_id = done["id"].as_str().unwrap();
    browser
        .post(app.url(&format!("/projects/{done_id}/complete")))
        .send()
        .await
        .unwrap();
    let janes_id = janes["id"].as_str().unwrap();
    app.post_auth(&format!("/api/v1/projects/{janes_id}/complete"), &jane, &json!({}))
        .await;

    let (_, home) = page(&browser, app.url("/")).await;
    assert!(home.contains("Still Going"));
    assert!(!home.contains("All Wrapped Up"));
    assert!(home.contains("href=\"/projects/completed\""));

    let (status, completed) = page(&browser, app.url("/projects/completed")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(completed.contains("All Wrapped Up"));
    assert!(!completed.contains("Still Going"));
    assert!(!completed.contains("Jane Finished"));

    common::cleanup(app).await;
}

#[tokio::test]
async fn tasks_and_notes_from_the_project_page() {
    let app = common::spawn_app().await;
    let token = app.sign_up_joe().await;
    let project = app.create_project(&token, &json!({ "name": "Test Project" })).await;
    let id = project["id"].as_str().unwrap();
    let browser = app.browser(JOE).await;

    let resp = browser
        .post(app.url(&format!("/projects/{id}/tasks")))
        .form(&[("name", "Buy milk")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Task was successfully created"));
    assert!(body.contains("Buy milk"));
    assert_eq!(app.task_count(id).await, 1);

    let resp = browser
        .post(app.url(&format!("/projects/{id}/notes")))
        .form(&[("message", "Remember the oat milk")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().contains("Remember the oat milk"));

    let resp = browser
        .post(app.url(&format!("/projects/{id}/tasks")))
        .form(&[("name", "  ")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(app.task_count(id).await, 1);

    common::cleanup(app).await;
}

#[tokio::test]
async fn anonymous_task_form_post_changes_nothing() {
    let app = common::spawn_app().await;
    let token = app.sign_up_joe().await;
    let project = app.create_project(&token, &json!({ "name": "Test Project" })).await;
    let id = project["id"].as_str().unwrap();

    let resp = app
        .client
        .post(app.url(&format!("/projects/{id}/tasks")))
        .form(&[("name", "New test task")])
        .send()
        .await
        .unwrap();
    assert!(!resp.status().is_success());
    assert_eq!(resp.headers()["location"], "/auth/login");
    assert_eq!(app.task_count(id).await, 0);

    common::cleanup(app).await;
}

#[tokio::test]
async fn session_of_a_removed_account_lands_on_login() {
    let app = common::spawn_app().await;
    app.sign_up_joe().await;
    let browser = app.browser(JOE).await;

    sqlx::query("DELETE FROM users WHERE email = $1")
        .bind(JOE)
        .execute(&app.pool)
        .await
        .unwrap();

    let resp = browser.get(app.url("/auth/login")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.url().path(), "/auth/login");
    assert!(resp.text().await.unwrap().contains("Sign in"));

    // The stale cookies were cleared, so the project list redirects once and stops
    let resp = browser.get(app.url("/")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.url().path(), "/auth/login");

    common::cleanup(app).await;
}
