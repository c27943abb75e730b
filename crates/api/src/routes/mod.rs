//! API route definitions.

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{AppState, middleware::auth::auth_middleware};
use cofre_shared::AppError;

pub mod accounts;
pub mod auth;
pub mod categories;
pub mod dashboard;
pub mod donations;
pub mod health;
pub mod movements;
pub mod obligations;
pub mod parties;

/// Creates the API router with public and protected routes.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(auth::protected_routes())
        .merge(accounts::routes())
        .merge(obligations::routes())
        .merge(donations::routes())
        .merge(parties::routes())
        .merge(categories::routes())
        .merge(movements::routes())
        .merge(dashboard::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Combine public and protected routes
    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}

/// Builds a JSON error response with a stable code.
pub(crate) fn error_response(status: u16, code: &str, message: impl Into<String>) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let message: String = message.into();
    (
        status,
        Json(json!({ "error": code, "message": message })),
    )
        .into_response()
}

/// Maps an application error to a response, hiding internals on 500s.
pub(crate) fn app_error_response(err: &AppError) -> Response {
    let message = if err.status_code() >= 500 {
        "An error occurred".to_string()
    } else {
        err.to_string()
    };
    error_response(err.status_code(), err.error_code(), message)
}

/// Maps a repository error to a response, hiding internals on 500s.
macro_rules! repo_error_response {
    ($err:expr) => {{
        let status = $err.http_status_code();
        let message = if status >= 500 {
            tracing::error!(error = %$err, "Repository operation failed");
            "An error occurred".to_string()
        } else {
            $err.to_string()
        };
        crate::routes::error_response(status, $err.error_code(), message)
    }};
}

pub(crate) use repo_error_response;
