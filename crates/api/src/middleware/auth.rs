//! Authentication middleware for protected routes.
//!
//! Tokens are only half of the story: the JWT carries an opaque session
//! token whose hash must match an active, unexpired session row. Each
//! successful check renews the session's sliding expiry, mirroring the
//! reference behavior of one active session per user.

use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use crate::AppState;
use cofre_db::SessionRepository;
use cofre_shared::{Claims, JwtError};

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}

fn unauthorized(code: &str, message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": code, "message": message })),
    )
        .into_response()
}

/// Authentication middleware that validates JWT tokens against sessions.
///
/// 1. Extracts the Bearer token from the Authorization header
/// 2. Validates the JWT signature and expiry
/// 3. Checks the embedded session token is active and unexpired
/// 4. Renews the session's sliding expiry
/// 5. Stores the claims in request extensions for handlers to access
pub async fn auth_middleware(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(token) = auth_header.and_then(extract_bearer_token) else {
        return unauthorized(
            "MISSING_TOKEN",
            "Authorization header with Bearer token is required",
        );
    };

    let claims = match state.jwt_service.validate_token(token) {
        Ok(claims) => claims,
        Err(JwtError::Expired) => return unauthorized("TOKEN_EXPIRED", "Token has expired"),
        Err(_) => return unauthorized("INVALID_TOKEN", "Invalid or malformed token"),
    };

    let session_repo = SessionRepository::new((*state.db).clone());
    let session = match session_repo
        .find_active_by_token(claims.session_token())
        .await
    {
        Ok(Some(session)) if session.user_id == claims.user_id() => session,
        Ok(_) => {
            return unauthorized(
                "SESSION_EXPIRED",
                "Session expired or revoked. Please log in again",
            );
        }
        Err(e) => {
            error!(error = %e, "Database error validating session");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "INTERNAL_ERROR",
                    "message": "An error occurred"
                })),
            )
                .into_response();
        }
    };

    // Sliding expiry: activity renews the session window.
    if let Err(e) = session_repo.touch(session.id, state.session_minutes).await {
        error!(error = %e, "Failed to renew session activity");
    }

    request.extensions_mut().insert(claims);
    next.run(request).await
}

/// Extractor for authenticated user claims.
///
/// Use this in handlers to get the authenticated user:
///
/// ```ignore
/// async fn handler(auth: AuthUser) -> impl IntoResponse {
///     let user_id = auth.user_id();
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Returns the user ID from the claims.
    #[must_use]
    pub const fn user_id(&self) -> uuid::Uuid {
        self.0.user_id()
    }

    /// Returns the opaque session token from the claims.
    #[must_use]
    pub fn session_token(&self) -> &str {
        self.0.session_token()
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({
                        "error": "UNAUTHORIZED",
                        "message": "Authentication required"
                    })),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Bearer abc", Some("abc"))]
    #[case("bearer abc", Some("abc"))]
    #[case("Basic abc", None)]
    #[case("Bearer", None)]
    #[case("", None)]
    fn test_extract_bearer_token(#[case] header: &str, #[case] expected: Option<&str>) {
        assert_eq!(extract_bearer_token(header), expected);
    }
}
