//! Authentication routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header::USER_AGENT},
    response::IntoResponse,
    routing::{delete, get, post},
};
use uuid::Uuid;
use serde_json::json;
use tracing::{error, info};

use crate::{
    AppState,
    middleware::AuthUser,
    routes::{app_error_response, error_response},
};
use cofre_core::auth::{hash_password, verify_password};
use cofre_db::{SessionRepository, UserRepository, repositories::UserError};
use cofre_shared::{
    AppError,
    auth::{LoginRequest, LoginResponse, RegisterRequest},
};

/// Creates the public authentication routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

/// Creates the authentication routes that require an existing session.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/logout", post(logout))
        .route("/auth/check", get(check))
        .route("/auth/register", post(register))
        .route("/users", get(list_users))
        .route("/users/{id}", delete(delete_user))
}

/// POST `/auth/login` - Authenticate and open a session.
///
/// Opening a new session revokes every previous session of the user.
async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    let user_repo = UserRepository::new((*state.db).clone());

    let user = match user_repo.find_by_username(&payload.username).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return app_error_response(&AppError::Unauthorized(
                "Incorrect username or password".to_string(),
            ));
        }
        Err(e) => {
            error!(error = %e, "Failed to look up user");
            return app_error_response(&AppError::Internal(e.to_string()));
        }
    };

    match verify_password(&payload.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            return app_error_response(&AppError::Unauthorized(
                "Incorrect username or password".to_string(),
            ));
        }
        Err(e) => {
            error!(error = %e, "Password verification failed");
            return app_error_response(&AppError::Internal(e.to_string()));
        }
    }

    let user_agent = headers.get(USER_AGENT).and_then(|v| v.to_str().ok());
    let ip_address = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim);

    let session_repo = SessionRepository::new((*state.db).clone());
    let new_session = match session_repo
        .create(user.id, user_agent, ip_address, state.session_minutes)
        .await
    {
        Ok(session) => session,
        Err(e) => {
            error!(error = %e, "Failed to create session");
            return app_error_response(&AppError::Internal(e.to_string()));
        }
    };

    let access_token = match state
        .jwt_service
        .generate_access_token(user.id, &new_session.token)
    {
        Ok(token) => token,
        Err(e) => {
            error!(error = %e, "Failed to generate access token");
            return app_error_response(&AppError::Internal(e.to_string()));
        }
    };

    info!(user_id = %user.id, "User logged in");

    (
        StatusCode::OK,
        Json(LoginResponse {
            access_token,
            token_type: "bearer".to_string(),
            expires_in: state.jwt_service.access_token_expires_secs(),
        }),
    )
        .into_response()
}

/// POST `/auth/logout` - Revoke the current session.
async fn logout(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let session_repo = SessionRepository::new((*state.db).clone());

    match session_repo.revoke_by_token(auth.session_token()).await {
        Ok(_) => {
            info!(user_id = %auth.user_id(), "User logged out");
            (StatusCode::OK, Json(json!({ "message": "Logged out" }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to revoke session");
            app_error_response(&AppError::Internal(e.to_string()))
        }
    }
}

/// GET `/auth/check` - Confirm the session is still valid.
async fn check(auth: AuthUser) -> impl IntoResponse {
    Json(json!({ "valid": true, "user_id": auth.user_id() }))
}

/// POST `/auth/register` - Create a new user (requires an authenticated
/// caller; this is a closed system with no self-service signup).
async fn register(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<RegisterRequest>,
) -> impl IntoResponse {
    if payload.username.trim().is_empty() || payload.password.is_empty() {
        return app_error_response(&AppError::Validation(
            "Username and password are required".to_string(),
        ));
    }

    let password_hash = match hash_password(&payload.password) {
        Ok(hash) => hash,
        Err(e) => {
            error!(error = %e, "Failed to hash password");
            return app_error_response(&AppError::Internal(e.to_string()));
        }
    };

    let user_repo = UserRepository::new((*state.db).clone());
    match user_repo.create(payload.username, password_hash).await {
        Ok(user) => {
            info!(
                user_id = %user.id,
                created_by = %auth.user_id(),
                "User registered"
            );
            (
                StatusCode::CREATED,
                Json(json!({
                    "id": user.id,
                    "username": user.username,
                    "created_at": user.created_at
                })),
            )
                .into_response()
        }
        Err(e @ UserError::DuplicateUsername(_)) => {
            error_response(e.http_status_code(), e.error_code(), e.to_string())
        }
        Err(e) => {
            error!(error = %e, "Failed to create user");
            app_error_response(&AppError::Internal(e.to_string()))
        }
    }
}

/// GET `/users` - List users.
async fn list_users(State(state): State<AppState>, _auth: AuthUser) -> impl IntoResponse {
    let user_repo = UserRepository::new((*state.db).clone());

    match user_repo.list().await {
        Ok(users) => {
            let users: Vec<serde_json::Value> = users
                .into_iter()
                .map(|u| {
                    json!({
                        "id": u.id,
                        "username": u.username,
                        "created_at": u.created_at
                    })
                })
                .collect();
            (StatusCode::OK, Json(users)).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list users");
            app_error_response(&AppError::Internal(e.to_string()))
        }
    }
}

/// DELETE `/users/{id}` - Delete a user and revoke their sessions.
async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if id == auth.user_id() {
        return app_error_response(&AppError::Validation(
            "You cannot delete your own user".to_string(),
        ));
    }

    let session_repo = SessionRepository::new((*state.db).clone());
    if let Err(e) = session_repo.revoke_all_for_user(id).await {
        error!(error = %e, "Failed to revoke sessions for deleted user");
        return app_error_response(&AppError::Internal(e.to_string()));
    }

    let user_repo = UserRepository::new((*state.db).clone());
    match user_repo.delete(id).await {
        Ok(()) => {
            info!(user_id = %id, deleted_by = %auth.user_id(), "User deleted");
            (StatusCode::OK, Json(json!({ "message": "User deleted" }))).into_response()
        }
        Err(e @ UserError::NotFound(_)) => {
            error_response(e.http_status_code(), e.error_code(), e.to_string())
        }
        Err(e) => {
            error!(error = %e, "Failed to delete user");
            app_error_response(&AppError::Internal(e.to_string()))
        }
    }
}
