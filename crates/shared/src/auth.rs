//! Authentication types for access tokens and sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims for access tokens.
///
/// Carries the user identity plus the opaque session token backing this
/// login. The auth middleware checks the referenced session is still active
/// on every request, so revoking the session invalidates outstanding tokens
/// immediately even before the JWT itself expires.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: Uuid,
    /// Opaque session token backing this login (stored hashed server-side).
    pub sid: String,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user session.
    #[must_use]
    pub fn new(user_id: Uuid, session_token: &str, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            sid: session_token.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.sub
    }

    /// Returns the opaque session token from claims.
    #[must_use]
    pub fn session_token(&self) -> &str {
        &self.sid
    }
}

/// Login request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Username.
    pub username: String,
    /// Password.
    pub password: String,
}

/// Login response payload.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    /// Access token (Bearer).
    pub access_token: String,
    /// Token type, always `"bearer"`.
    pub token_type: String,
    /// Token expiration in seconds.
    pub expires_in: i64,
}

/// Registration request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    /// Username (unique).
    pub username: String,
    /// Password.
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_claims_accessors() {
        let user = Uuid::new_v4();
        let claims = Claims::new(user, "opaque-token", Utc::now() + Duration::minutes(30));

        assert_eq!(claims.user_id(), user);
        assert_eq!(claims.session_token(), "opaque-token");
        assert!(claims.exp > claims.iat);
    }
}
