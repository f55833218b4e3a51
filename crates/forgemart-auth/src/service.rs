//! Session lifecycle service: login, validation, logout, revocation,
//! and expired-session sweeps.

use chrono::{DateTime, Utc};
use forgemart_core::error::CoreError;
use forgemart_core::models::session::{CreateSession, Session};
use forgemart_core::models::user::UserProfile;
use forgemart_core::repository::{SessionRepository, UserRepository};
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::error::AuthError;
use crate::password;
use crate::token;

/// Successful login result.
#[derive(Debug)]
pub struct LoginOutput {
    /// Raw opaque session token; the HTTP layer carries it to the
    /// client as a cookie.
    pub token: String,
    pub user: UserProfile,
}

/// Session lifecycle service.
///
/// Generic over repository implementations so this layer has no
/// dependency on the database crate, and tests can substitute an
/// in-memory store.
pub struct SessionService<U: UserRepository, S: SessionRepository> {
    user_repo: U,
    session_repo: S,
    config: SessionConfig,
}

impl<U: UserRepository, S: SessionRepository> SessionService<U, S> {
    pub fn new(user_repo: U, session_repo: S, config: SessionConfig) -> Self {
        Self {
            user_repo,
            session_repo,
            config,
        }
    }

    /// Authenticate an email/password pair and open a session.
    ///
    /// Failure paths never touch the session store.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutput, AuthError> {
        // 1. Look up by lowercased email. An unknown address must be
        //    indistinguishable from a wrong password.
        let user = match self.user_repo.get_by_email(&email.to_lowercase()).await {
            Ok(u) => u,
            Err(CoreError::NotFound { .. }) => return Err(AuthError::InvalidCredentials),
            Err(e) => return Err(e.into()),
        };

        // 2. Verify the password.
        if !password::verify_password(password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        // 3. Check the account is still active. This runs only after
        //    credential success, so a caller holding the correct
        //    password sees "disabled" rather than "invalid".
        if !user.is_active {
            return Err(AuthError::AccountDisabled);
        }

        // 4. Open the session.
        let expires_at = Utc::now() + chrono::Duration::hours(self.config.lifetime_hours);
        let session = self.create_session(user.id, expires_at).await?;

        // 5. Record the login time.
        self.user_repo.touch_last_login(user.id, Utc::now()).await?;

        Ok(LoginOutput {
            token: session.token,
            user: UserProfile::from(&user),
        })
    }

    /// Write a session row, retrying exactly once with a fresh token
    /// on a collision. A second collision surfaces as fatal.
    async fn create_session(
        &self,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<Session, AuthError> {
        match self.try_create_session(user_id, expires_at).await {
            Err(CoreError::Conflict { .. }) => {
                match self.try_create_session(user_id, expires_at).await {
                    Err(CoreError::Conflict { .. }) => Err(AuthError::TokenCollision),
                    other => other.map_err(Into::into),
                }
            }
            other => other.map_err(Into::into),
        }
    }

    async fn try_create_session(
        &self,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<Session, CoreError> {
        self.session_repo
            .create(CreateSession {
                user_id,
                token: token::generate_session_token(),
                expires_at,
            })
            .await
    }

    /// Resolve a token to the owning user's public fields.
    ///
    /// Applies the session state machine: an absent row is
    /// unauthenticated; an expired row or one owned by a deactivated
    /// user is deleted on observation and reported unauthenticated.
    pub async fn validate(&self, session_token: &str) -> Result<Option<UserProfile>, AuthError> {
        let Some(found) = self.session_repo.find_by_token(session_token).await? else {
            return Ok(None);
        };

        if Utc::now() >= found.session.expires_at || !found.user.is_active {
            // Lazy expiry. Racing observers may both reach this
            // delete; the store contract makes it idempotent.
            self.session_repo.delete_by_token(session_token).await?;
            return Ok(None);
        }

        Ok(Some(found.user))
    }

    /// Close a single session. Idempotent; callers clear the cookie
    /// regardless.
    pub async fn logout(&self, session_token: &str) -> Result<(), AuthError> {
        self.session_repo.delete_by_token(session_token).await?;
        Ok(())
    }

    /// Close every session the user owns (deactivation or credential
    /// change).
    pub async fn revoke_all(&self, user_id: Uuid) -> Result<(), AuthError> {
        self.session_repo.delete_all_for_user(user_id).await?;
        Ok(())
    }

    /// Remove sessions already past their expiry. Validation does not
    /// depend on this; it keeps the table small.
    pub async fn sweep_expired(&self) -> Result<u64, AuthError> {
        Ok(self.session_repo.delete_expired(Utc::now()).await?)
    }
}
