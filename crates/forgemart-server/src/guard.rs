//! Edge route guard.
//!
//! A cheap gate that runs before any handler and inspects cookie
//! PRESENCE only; the session store is not reachable from this tier.
//! A forged or expired cookie therefore passes, and the auth handlers
//! remain the authoritative check via the session service.

use axum::extract::Request;
use axum::http::header::COOKIE;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};

use crate::handlers::SESSION_COOKIE;

/// Path prefixes that require an authenticated browser context.
const PROTECTED_PREFIXES: &[&str] = &["/account", "/admin", "/orders", "/quotes"];

/// Path prefixes that only make sense without a session.
const AUTH_PREFIXES: &[&str] = &["/login", "/register", "/forgot-password"];

/// Where cookie-less protected requests are sent.
const LOGIN_PATH: &str = "/login";

/// Where already-authenticated requests to auth pages are sent.
const ACCOUNT_PATH: &str = "/account";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GuardClass {
    /// Assets, API calls, and file requests bypass the guard.
    Skip,
    Protected,
    AuthOnly,
    Public,
}

fn classify(path: &str) -> GuardClass {
    if path.starts_with("/api/") || path.starts_with("/assets/") || has_file_extension(path) {
        return GuardClass::Skip;
    }
    if matches_prefix(path, PROTECTED_PREFIXES) {
        return GuardClass::Protected;
    }
    if matches_prefix(path, AUTH_PREFIXES) {
        return GuardClass::AuthOnly;
    }
    GuardClass::Public
}

/// Prefix match on whole path segments: `/account` and `/account/x`
/// match, `/accounting` does not.
fn matches_prefix(path: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|prefix| {
        path.strip_prefix(prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    })
}

fn has_file_extension(path: &str) -> bool {
    path.rsplit('/').next().is_some_and(|seg| seg.contains('.'))
}

/// True when any `Cookie` header names the session cookie, valid or
/// not.
fn has_session_cookie(request: &Request) -> bool {
    request
        .headers()
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|header| header.split(';'))
        .any(|pair| {
            pair.trim_start()
                .strip_prefix(SESSION_COOKIE)
                .is_some_and(|rest| rest.starts_with('='))
        })
}

/// Middleware entry point. Layer this over the whole router.
pub async fn edge_guard(request: Request, next: Next) -> Response {
    match classify(request.uri().path()) {
        GuardClass::Skip | GuardClass::Public => next.run(request).await,
        GuardClass::Protected => {
            if has_session_cookie(&request) {
                next.run(request).await
            } else {
                let target = format!(
                    "{LOGIN_PATH}?returnUrl={}",
                    urlencoding::encode(request.uri().path())
                );
                Redirect::temporary(&target).into_response()
            }
        }
        GuardClass::AuthOnly => {
            if has_session_cookie(&request) {
                Redirect::temporary(ACCOUNT_PATH).into_response()
            } else {
                next.run(request).await
            }
        }
    }
}
