//! Authentication route handlers.
//!
//! Cookie policy lives here, on the service's caller: handlers attach
//! the session token to the response as an http-only cookie and clear
//! it on logout. The service itself never sees HTTP types.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use serde_json::json;
use surrealdb::Connection;
use tracing::{info, warn};

use forgemart_auth::AuthError;
use forgemart_core::models::user::UserProfile;

use crate::state::{AppState, CookiePolicy};

/// Session cookie name.
pub const SESSION_COOKIE: &str = "forgemart_session";

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Maps the auth error taxonomy onto HTTP responses. Store and crypto
/// failures become an opaque 503; the real cause goes to the log only.
#[derive(Debug)]
pub struct ApiError(AuthError);

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        if matches!(
            err,
            AuthError::Store(_) | AuthError::Crypto(_) | AuthError::TokenCollision
        ) {
            warn!(error = %err, "auth infrastructure failure");
        }
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self.0 {
            AuthError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                self.0.to_string(),
            ),
            AuthError::AccountDisabled => (
                StatusCode::FORBIDDEN,
                "account_disabled",
                self.0.to_string(),
            ),
            AuthError::NotAuthenticated => (
                StatusCode::UNAUTHORIZED,
                "not_authenticated",
                self.0.to_string(),
            ),
            AuthError::TokenCollision | AuthError::Crypto(_) | AuthError::Store(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "service_unavailable",
                "service temporarily unavailable".to_string(),
            ),
        };

        (
            status,
            Json(json!({
                "error": code,
                "message": message,
            })),
        )
            .into_response()
    }
}

/// `POST /api/auth/login`
pub async fn login<C: Connection>(
    State(state): State<AppState<C>>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> Result<(CookieJar, Json<UserProfile>), ApiError> {
    let output = state.sessions.login(&request.email, &request.password).await?;
    info!(user_id = %output.user.id, "login succeeded");

    let jar = jar.add(session_cookie(output.token, state.cookie));
    Ok((jar, Json(output.user)))
}

/// `GET /api/auth/me`: the authoritative session check behind the
/// edge guard's presence-only tier.
pub async fn current_user<C: Connection>(
    State(state): State<AppState<C>>,
    jar: CookieJar,
) -> Result<Json<UserProfile>, ApiError> {
    let Some(cookie) = jar.get(SESSION_COOKIE) else {
        return Err(AuthError::NotAuthenticated.into());
    };

    match state.sessions.validate(cookie.value()).await? {
        Some(profile) => Ok(Json(profile)),
        None => Err(AuthError::NotAuthenticated.into()),
    }
}

/// `POST /api/auth/logout`: idempotent, and the cookie is cleared
/// whether or not a session row existed.
pub async fn logout<C: Connection>(
    State(state): State<AppState<C>>,
    jar: CookieJar,
) -> Result<(CookieJar, StatusCode), ApiError> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.sessions.logout(cookie.value()).await?;
    }

    let jar = jar.remove(removal_cookie());
    Ok((jar, StatusCode::OK))
}

/// `GET /healthz`
pub async fn healthz() -> &'static str {
    "ok"
}

/// Fallback for paths this service does not handle; page rendering is
/// owned by the storefront frontend.
pub async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}

fn session_cookie(token: String, policy: CookiePolicy) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(policy.secure)
        .path("/")
        .max_age(time::Duration::seconds(policy.max_age_secs))
        .build()
}

fn removal_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}
