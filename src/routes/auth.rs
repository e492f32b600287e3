use std::sync::LazyLock;

use axum::extract::State;
use axum::Json;
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::CookieJar;
use chrono::{Duration, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::auth::extractor::AuthUser;
use crate::auth::jwt::{ACCESS_TOKEN_MINUTES, Claims, encode_token};
use crate::auth::password;
use crate::config::RegistrationMode;
use crate::db;
use crate::error::AppError;
use crate::models::User;
use crate::state::SharedState;
use crate::validation::{self, ValidationErrors};

const REFRESH_TOKEN_DAYS: i64 = 7;
const MIN_PASSWORD_LEN: usize = 8;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

fn auth_cookies(access_token: &str, refresh_token: &str, secure: bool) -> CookieJar {
    let access = Cookie::build(("access_token", access_token.to_string()))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::minutes(ACCESS_TOKEN_MINUTES))
        .build();

    let refresh = Cookie::build(("refresh_token", refresh_token.to_string()))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::days(REFRESH_TOKEN_DAYS))
        .build();

    CookieJar::new().add(access).add(refresh)
}

pub(crate) fn clear_auth_cookies() -> CookieJar {
    let access = Cookie::build(("access_token", ""))
        .path("/")
        .max_age(time::Duration::ZERO)
        .build();
    let refresh = Cookie::build(("refresh_token", ""))
        .path("/")
        .max_age(time::Duration::ZERO)
        .build();
    CookieJar::new().add(access).add(refresh)
}

fn generate_refresh_token() -> String {
    let bytes: [u8; 32] = rand::random();
    hex::encode(bytes)
}

fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Issue an access token and a fresh refresh token for `user`, as cookies and as a body.
pub(crate) async fn issue_session(
    state: &SharedState,
    user: &User,
) -> Result<(CookieJar, AuthResponse), AppError> {
    let access_token =
        encode_token(&Claims::new(user.id), &state.config.jwt_secret).map_err(AppError::Internal)?;

    let refresh = generate_refresh_token();
    db::refresh_tokens::create(
        &state.pool,
        user.id,
        &hash_token(&refresh),
        Utc::now() + Duration::days(REFRESH_TOKEN_DAYS),
    )
    .await?;

    let jar = auth_cookies(&access_token, &refresh, state.config.secure_cookies);
    Ok((
        jar,
        AuthResponse {
            access_token,
            refresh_token: refresh,
        },
    ))
}

/// Validate and create an account.
pub(crate) async fn create_account(
    state: &SharedState,
    req: &RegisterRequest,
) -> Result<User, AppError> {
    if state.config.registration == RegistrationMode::Closed {
        return Err(AppError::Forbidden("Registration is closed".to_string()));
    }

    let mut errors = ValidationErrors::new();
    validation::require_present(&mut errors, "first_name", req.first_name.as_deref());
    validation::require_present(&mut errors, "last_name", req.last_name.as_deref());
    validation::require_present(&mut errors, "email", req.email.as_deref());
    validation::require_present(&mut errors, "password", req.password.as_deref());

    let email = normalize_email(req.email.as_deref().unwrap_or_default());
    if !email.is_empty() && !EMAIL_RE.is_match(&email) {
        errors.add("email", "is invalid");
    }

    let password = req.password.as_deref().unwrap_or_default();
    if !password.is_empty() && password.chars().count() < MIN_PASSWORD_LEN {
        errors.add("password", "is too short (minimum is 8 characters)");
    }
    errors.into_result()?;

    let pw_hash = password::hash(password).map_err(AppError::Internal)?;

    let user = db::users::create(
        &state.pool,
        req.first_name.as_deref().map(str::trim).unwrap_or_default(),
        req.last_name.as_deref().map(str::trim).unwrap_or_default(),
        &email,
        &pw_hash,
    )
    .await
    .map_err(|e| AppError::unique_violation(e, db::users::EMAIL_KEY, "email"))?;

    tracing::info!(user_id = %user.id, "user registered");
    Ok(user)
}

/// Check credentials, applying the per-email failure limit.
pub(crate) async fn authenticate(
    state: &SharedState,
    email: &str,
    password: &str,
) -> Result<User, AppError> {
    let email = normalize_email(email);

    if state.login_limiter.check(&email).is_err() {
        return Err(AppError::RateLimited(
            "Too many login attempts. Please try again later.".to_string(),
        ));
    }

    let Some(user) = db::users::find_by_email(&state.pool, &email).await? else {
        state.login_limiter.record_failure(&email);
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    };

    let valid = password::verify(password, &user.password_hash).map_err(AppError::Internal)?;

    if !valid {
        state.login_limiter.record_failure(&email);
        tracing::warn!(user_id = %user.id, "failed login attempt");
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    state.login_limiter.reset(&email);
    tracing::info!(user_id = %user.id, "user signed in");
    Ok(user)
}

/// Revoke the refresh token carried by `jar`, if any.
pub(crate) async fn revoke_session(state: &SharedState, jar: &CookieJar) -> Result<(), AppError> {
    if let Some(cookie) = jar.get("refresh_token") {
        db::refresh_tokens::delete_by_hash(&state.pool, &hash_token(cookie.value())).await?;
    }
    Ok(())
}

pub async fn register(
    State(state): State<SharedState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    let user = create_account(&state, &req).await?;
    let (jar, body) = issue_session(&state, &user).await?;
    Ok((jar, Json(body)))
}

pub async fn login(
    State(state): State<SharedState>,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    let user = authenticate(&state, &req.email, &req.password).await?;
    let (jar, body) = issue_session(&state, &user).await?;
    Ok((jar, Json(body)))
}

pub async fn refresh(
    State(state): State<SharedState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    let refresh_value = jar
        .get("refresh_token")
        .map(|c| c.value().to_string())
        .ok_or_else(|| AppError::Unauthorized("Missing refresh token".to_string()))?;

    let stored = db::refresh_tokens::find_by_hash(&state.pool, &hash_token(&refresh_value))
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid refresh token".to_string()))?;

    if stored.expires_at < Utc::now() {
        return Err(AppError::Unauthorized("Refresh token expired".to_string()));
    }

    if stored.used || !db::refresh_tokens::mark_used(&state.pool, stored.id).await? {
        tracing::warn!(
            "Refresh token reuse detected for user {}. Nuking all sessions.",
            stored.user_id
        );
        db::refresh_tokens::delete_all_for_user(&state.pool, stored.user_id).await?;
        return Err(AppError::Unauthorized(
            "Refresh token reuse detected. All sessions revoked.".to_string(),
        ));
    }

    let user = db::users::find_by_id(&state.pool, stored.user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;

    let (jar, body) = issue_session(&state, &user).await?;
    Ok((jar, Json(body)))
}

pub async fn logout(
    State(state): State<SharedState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<MessageResponse>), AppError> {
    revoke_session(&state, &jar).await?;

    Ok((
        clear_auth_cookies(),
        Json(MessageResponse {
            message: "Logged out successfully".to_string(),
        }),
    ))
}

pub async fn me(auth: AuthUser, State(state): State<SharedState>) -> Result<Json<User>, AppError> {
    Ok(Json(auth.user(&state.pool).await?))
}
