//! Session domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::UserProfile;

/// One authenticated browser context. A user may hold many sessions.
///
/// A session is valid iff `now < expires_at` and the owning user is
/// still active; a read that observes either condition failing deletes
/// the record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Opaque, unguessable, unique across all sessions.
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSession {
    pub user_id: Uuid,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// A session joined with the owning user's public fields, the shape
/// returned by token lookup. The active flag rides along so the
/// lifecycle layer can observe deactivation without a second query.
#[derive(Debug, Clone)]
pub struct SessionWithUser {
    pub session: Session,
    pub user: UserProfile,
}
