//! Shared application state.

use std::sync::Arc;

use forgemart_auth::SessionService;
use forgemart_db::repository::{SurrealSessionRepository, SurrealUserRepository};
use surrealdb::Connection;

/// Cookie issuance policy shared by the auth handlers.
#[derive(Debug, Clone, Copy)]
pub struct CookiePolicy {
    /// `Secure` attribute; on in production deployments.
    pub secure: bool,
    /// Max-Age mirroring the configured session lifetime.
    pub max_age_secs: i64,
}

pub struct AppState<C: Connection> {
    pub sessions: Arc<SessionService<SurrealUserRepository<C>, SurrealSessionRepository<C>>>,
    pub cookie: CookiePolicy,
}

// Manual impl: the derive would demand `C: Clone`, which the Arc and
// Copy fields do not need.
impl<C: Connection> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            sessions: self.sessions.clone(),
            cookie: self.cookie,
        }
    }
}

impl<C: Connection> AppState<C> {
    pub fn new(
        sessions: SessionService<SurrealUserRepository<C>, SurrealSessionRepository<C>>,
        cookie: CookiePolicy,
    ) -> Self {
        Self {
            sessions: Arc::new(sessions),
            cookie,
        }
    }
}
