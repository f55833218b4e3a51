//! SurrealDB implementation of [`SessionRepository`].
//!
//! The raw opaque token is the lookup key, guarded by a unique index.
//! Deletes are written as bulk `DELETE ... WHERE` statements, which
//! are naturally idempotent; two racing lazy-expiry deletes both
//! succeed.

use chrono::{DateTime, Utc};
use forgemart_core::error::CoreResult;
use forgemart_core::models::session::{CreateSession, Session, SessionWithUser};
use forgemart_core::models::user::UserProfile;
use forgemart_core::repository::SessionRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::warn;
use uuid::Uuid;

use crate::error::DbError;
use crate::repository::user::parse_role;

#[derive(Debug, SurrealValue)]
struct SessionRow {
    user_id: String,
    token: String,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct SessionRowWithId {
    record_id: String,
    user_id: String,
    token: String,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

/// Public user fields embedded into a token lookup. The password hash
/// is never selected.
#[derive(Debug, SurrealValue)]
struct OwnerRow {
    email: String,
    name: String,
    role: String,
    company: Option<String>,
    avatar_url: Option<String>,
    is_active: bool,
}

fn row_to_session(row: SessionRow, id: Uuid) -> Result<Session, DbError> {
    let user_id = Uuid::parse_str(&row.user_id)
        .map_err(|e| DbError::Migration(format!("invalid user UUID: {e}")))?;
    Ok(Session {
        id,
        user_id,
        token: row.token,
        expires_at: row.expires_at,
        created_at: row.created_at,
    })
}

impl SessionRowWithId {
    fn try_into_session(self) -> Result<Session, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        let user_id = Uuid::parse_str(&self.user_id)
            .map_err(|e| DbError::Migration(format!("invalid user UUID: {e}")))?;
        Ok(Session {
            id,
            user_id,
            token: self.token,
            expires_at: self.expires_at,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Session repository.
#[derive(Clone)]
pub struct SurrealSessionRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealSessionRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> SessionRepository for SurrealSessionRepository<C> {
    async fn create(&self, input: CreateSession) -> CoreResult<Session> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('session', $id) SET \
                 user_id = $user_id, \
                 token = $token, \
                 expires_at = $expires_at",
            )
            .bind(("id", id_str.clone()))
            .bind(("user_id", input.user_id.to_string()))
            .bind(("token", input.token))
            .bind(("expires_at", input.expires_at))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::from_write(e, "session"))?;

        let rows: Vec<SessionRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "session".into(),
            id: id_str,
        })?;

        Ok(row_to_session(row, id)?)
    }

    async fn find_by_token(&self, token: &str) -> CoreResult<Option<SessionWithUser>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM session \
                 WHERE token = $token",
            )
            .bind(("token", token.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<SessionRowWithId> = result.take(0).map_err(DbError::from)?;
        let Some(row) = rows.into_iter().next() else {
            return Ok(None);
        };
        let session = row.try_into_session()?;

        let mut result = self
            .db
            .query(
                "SELECT email, name, role, company, avatar_url, is_active \
                 FROM type::record('user', $user_id)",
            )
            .bind(("user_id", session.user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let owners: Vec<OwnerRow> = result.take(0).map_err(DbError::from)?;
        let Some(owner) = owners.into_iter().next() else {
            // A session whose user row is gone cannot authenticate
            // anyone; report it absent and let the sweep reclaim it.
            warn!(user_id = %session.user_id, "session owner missing");
            return Ok(None);
        };

        let user = UserProfile {
            id: session.user_id,
            email: owner.email,
            name: owner.name,
            role: parse_role(&owner.role)?,
            company: owner.company,
            avatar_url: owner.avatar_url,
            is_active: owner.is_active,
        };

        Ok(Some(SessionWithUser { session, user }))
    }

    async fn delete_by_token(&self, token: &str) -> CoreResult<()> {
        self.db
            .query("DELETE session WHERE token = $token")
            .bind(("token", token.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn delete_all_for_user(&self, user_id: Uuid) -> CoreResult<()> {
        self.db
            .query("DELETE session WHERE user_id = $user_id")
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> CoreResult<u64> {
        // Count expired sessions first, then delete.
        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM session \
                 WHERE expires_at < $now \
                 GROUP ALL",
            )
            .bind(("now", now))
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        self.db
            .query("DELETE session WHERE expires_at < $now")
            .bind(("now", now))
            .await
            .map_err(DbError::from)?;

        Ok(total)
    }
}
