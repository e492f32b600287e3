pub mod config;
pub mod error;
pub mod state;
pub mod auth;
pub mod board;
pub mod db;
pub mod models;
pub mod middleware;
pub mod routes;
pub mod validation;
pub mod views;
pub mod rate_limit;

use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::middleware::auth_redirect::redirect_unauthorized;
use crate::rate_limit::LoginRateLimiter;
use crate::state::{AppState, SharedState};

pub fn build_app(pool: PgPool, config: Config) -> (Router, SharedState) {
    let state: SharedState = Arc::new(AppState {
        pool,
        config,
        login_limiter: LoginRateLimiter::new(),
    });

    let security_headers = ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-frame-options"),
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ));

    let app = Router::new()
        .merge(routes::api_routes())
        .merge(views::view_routes().layer(axum::middleware::from_fn(redirect_unauthorized)))
        .nest_service("/static", ServeDir::new("static"))
        .route("/health", axum::routing::get(health))
        .layer(security_headers)
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    (app, state)
}

async fn health() -> &'static str {
    "ok"
}
