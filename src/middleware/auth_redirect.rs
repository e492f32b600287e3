use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};

pub const LOGIN_PATH: &str = "/auth/login";

/// Middleware that redirects 401 responses to the login page for browser requests.
///
/// Anonymous form posts end up here too, so nothing is written for them.
pub async fn redirect_unauthorized(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let response = next.run(req).await;
    if response.status() == StatusCode::UNAUTHORIZED {
        tracing::debug!(%method, %path, "unauthenticated page request");
        Redirect::to(LOGIN_PATH).into_response()
    } else {
        response
    }
}
