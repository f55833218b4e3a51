//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Implementations are injected
//! into the session service at construction, which keeps the lifecycle
//! logic store-agnostic and lets tests substitute an in-memory store.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::CoreResult;
use crate::models::{
    session::{CreateSession, Session, SessionWithUser},
    user::{CreateUser, User},
};

pub trait UserRepository: Send + Sync {
    /// Hashes the password and lowercases the email before storage.
    /// Fails with `Conflict` on a duplicate email.
    fn create(&self, input: CreateUser) -> impl Future<Output = CoreResult<User>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = CoreResult<User>> + Send;
    /// Exact-match lookup; callers normalize case first.
    fn get_by_email(&self, email: &str) -> impl Future<Output = CoreResult<User>> + Send;
    /// Flip the active flag (admin deactivation / reactivation).
    fn set_active(&self, id: Uuid, active: bool) -> impl Future<Output = CoreResult<()>> + Send;
    fn touch_last_login(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> impl Future<Output = CoreResult<()>> + Send;
}

pub trait SessionRepository: Send + Sync {
    /// Fails with `Conflict` if the token already exists; the unique
    /// index is the collision backstop for the token generator.
    fn create(&self, input: CreateSession) -> impl Future<Output = CoreResult<Session>> + Send;
    /// Single logical lookup embedding the owning user's public
    /// fields. Never exposes the password hash.
    fn find_by_token(
        &self,
        token: &str,
    ) -> impl Future<Output = CoreResult<Option<SessionWithUser>>> + Send;
    /// Idempotent; no error if the row is already gone. Concurrent
    /// lazy-expiry deletes rely on this.
    fn delete_by_token(&self, token: &str) -> impl Future<Output = CoreResult<()>> + Send;
    /// Idempotent bulk delete of every session the user owns.
    fn delete_all_for_user(&self, user_id: Uuid) -> impl Future<Output = CoreResult<()>> + Send;
    /// Remove all sessions with `expires_at < now`; returns the count
    /// removed. Hygiene only, validation re-checks expiry itself.
    fn delete_expired(&self, now: DateTime<Utc>) -> impl Future<Output = CoreResult<u64>> + Send;
}
