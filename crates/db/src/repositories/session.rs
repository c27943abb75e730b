//! Session repository.
//!
//! Sessions back the bearer tokens: the JWT carries an opaque token whose
//! SHA-256 hash is stored here. One active session per user — logging in
//! revokes all previous sessions — and a sliding expiry renewed on every
//! authenticated request.

use chrono::{Duration, Utc};
use rand::RngCore;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
    sea_query::Expr,
};
use sha2::{Digest, Sha256};
use tracing::debug;
use uuid::Uuid;

use crate::entities::sessions;

/// A freshly created session together with its plaintext token.
///
/// The plaintext token exists only here; the database stores its hash.
#[derive(Debug)]
pub struct NewSession {
    /// The stored session row.
    pub session: sessions::Model,
    /// The opaque token to embed in the access token.
    pub token: String,
}

/// Session repository.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    db: DatabaseConnection,
}

impl SessionRepository {
    /// Creates a new session repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Hashes a session token for storage.
    #[must_use]
    pub fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Generates a random opaque session token.
    fn generate_token() -> String {
        let mut bytes = [0u8; 32];
        rand::rng().fill_bytes(&mut bytes);
        bytes.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Creates a session for a user, revoking all of their previous
    /// sessions first (single active session per user).
    ///
    /// # Errors
    ///
    /// Returns an error if the database operations fail.
    pub async fn create(
        &self,
        user_id: Uuid,
        user_agent: Option<&str>,
        ip_address: Option<&str>,
        ttl_minutes: i64,
    ) -> Result<NewSession, DbErr> {
        let revoked = self.revoke_all_for_user(user_id).await?;
        if revoked > 0 {
            debug!(%user_id, revoked, "Previous sessions revoked on login");
        }

        let token = Self::generate_token();
        let now = Utc::now();
        let session = sessions::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            token_hash: Set(Self::hash_token(&token)),
            user_agent: Set(user_agent.map(String::from)),
            ip_address: Set(ip_address.map(String::from)),
            expires_at: Set((now + Duration::minutes(ttl_minutes)).into()),
            last_activity_at: Set(now.into()),
            revoked_at: Set(None),
            created_at: Set(now.into()),
        };

        let session = session.insert(&self.db).await?;
        Ok(NewSession { session, token })
    }

    /// Finds the active, unexpired session for an opaque token.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_active_by_token(
        &self,
        token: &str,
    ) -> Result<Option<sessions::Model>, DbErr> {
        sessions::Entity::find()
            .filter(sessions::Column::TokenHash.eq(Self::hash_token(token)))
            .filter(sessions::Column::RevokedAt.is_null())
            .filter(sessions::Column::ExpiresAt.gt(Utc::now()))
            .one(&self.db)
            .await
    }

    /// Renews a session's sliding expiry and records the activity.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn touch(&self, id: Uuid, ttl_minutes: i64) -> Result<(), DbErr> {
        let now = Utc::now();
        sessions::ActiveModel {
            id: Set(id),
            last_activity_at: Set(now.into()),
            expires_at: Set((now + Duration::minutes(ttl_minutes)).into()),
            ..Default::default()
        }
        .update(&self.db)
        .await?;
        Ok(())
    }

    /// Revokes a session by its opaque token.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn revoke_by_token(&self, token: &str) -> Result<bool, DbErr> {
        let session = self.find_active_by_token(token).await?;
        let Some(session) = session else {
            return Ok(false);
        };

        sessions::ActiveModel {
            id: Set(session.id),
            revoked_at: Set(Some(Utc::now().into())),
            ..Default::default()
        }
        .update(&self.db)
        .await?;
        Ok(true)
    }

    /// Revokes every active session of a user. Returns the count.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn revoke_all_for_user(&self, user_id: Uuid) -> Result<u64, DbErr> {
        let result = sessions::Entity::update_many()
            .col_expr(sessions::Column::RevokedAt, Expr::value(Some(Utc::now())))
            .filter(sessions::Column::UserId.eq(user_id))
            .filter(sessions::Column::RevokedAt.is_null())
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }
}
