use askama::Template;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use crate::auth::jwt;
use crate::db;
use crate::error::AppError;
use crate::middleware::auth_redirect::LOGIN_PATH;
use crate::routes::auth::{self as session, RegisterRequest};
use crate::state::SharedState;
use crate::views::render;

#[derive(Template)]
#[template(path = "auth/login.html")]
struct LoginTemplate {
    email: String,
    error: Option<String>,
}

#[derive(Template)]
#[template(path = "auth/register.html")]
struct RegisterTemplate {
    first_name: String,
    last_name: String,
    email: String,
    errors: Vec<String>,
}

impl RegisterTemplate {
    fn from_request(req: &RegisterRequest, errors: Vec<String>) -> Self {
        Self {
            first_name: req.first_name.clone().unwrap_or_default(),
            last_name: req.last_name.clone().unwrap_or_default(),
            email: req.email.clone().unwrap_or_default(),
            errors,
        }
    }
}

#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// A session counts only while its token is valid and the account still exists.
async fn signed_in(state: &SharedState, jar: &CookieJar) -> Result<bool, AppError> {
    let Some(claims) = jar
        .get("access_token")
        .and_then(|c| jwt::decode_token(c.value(), &state.config.jwt_secret).ok())
    else {
        return Ok(false);
    };
    Ok(db::users::find_by_id(&state.pool, claims.sub).await?.is_some())
}

/// Serve a signed-out page, dropping any leftover session cookies.
fn signed_out_page(jar: &CookieJar, page: Html<String>) -> Response {
    if jar.get("access_token").is_some() || jar.get("refresh_token").is_some() {
        return (session::clear_auth_cookies(), page).into_response();
    }
    page.into_response()
}

pub async fn login_page(
    State(state): State<SharedState>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    // If already logged in, go straight to the project list
    if signed_in(&state, &jar).await? {
        return Ok(Redirect::to("/").into_response());
    }

    let template = LoginTemplate {
        email: String::new(),
        error: None,
    };
    Ok(signed_out_page(&jar, render(&template)?))
}

pub async fn login_submit(
    State(state): State<SharedState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let user = match session::authenticate(&state, &form.email, &form.password).await {
        Ok(user) => user,
        Err(AppError::Unauthorized(msg) | AppError::RateLimited(msg)) => {
            let template = LoginTemplate {
                email: form.email,
                error: Some(msg),
            };
            // 401 would be turned into a redirect by the view middleware
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, render(&template)?).into_response());
        }
        Err(e) => return Err(e),
    };

    let (jar, _) = session::issue_session(&state, &user).await?;
    Ok((jar, Redirect::to("/")).into_response())
}

pub async fn register_page(
    State(state): State<SharedState>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    if signed_in(&state, &jar).await? {
        return Ok(Redirect::to("/").into_response());
    }
    let template = RegisterTemplate::from_request(&RegisterRequest::default(), Vec::new());
    Ok(signed_out_page(&jar, render(&template)?))
}

pub async fn register_submit(
    State(state): State<SharedState>,
    Form(req): Form<RegisterRequest>,
) -> Result<Response, AppError> {
    let user = match session::create_account(&state, &req).await {
        Ok(user) => user,
        Err(AppError::Validation(errors)) => {
            let template = RegisterTemplate::from_request(&req, errors.full_messages());
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, render(&template)?).into_response());
        }
        Err(AppError::Forbidden(msg)) => {
            let template = RegisterTemplate::from_request(&req, vec![msg]);
            return Ok((StatusCode::FORBIDDEN, render(&template)?).into_response());
        }
        Err(e) => return Err(e),
    };

    let (jar, _) = session::issue_session(&state, &user).await?;
    Ok((jar, Redirect::to("/")).into_response())
}

pub async fn logout_submit(
    State(state): State<SharedState>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    session::revoke_session(&state, &jar).await?;
    Ok((session::clear_auth_cookies(), Redirect::to(LOGIN_PATH)).into_response())
}
