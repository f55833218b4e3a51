//! Router assembly.

use axum::Router;
use axum::middleware;
use axum::routing::{get, post};
use surrealdb::Connection;
use tower_http::trace::TraceLayer;

use crate::guard;
use crate::handlers;
use crate::state::AppState;

/// Create the main application router.
///
/// The edge guard wraps every route and the fallback; the trace layer
/// sits outermost.
pub fn create_app<C: Connection>(state: AppState<C>) -> Router {
    Router::new()
        .route("/api/auth/login", post(handlers::login::<C>))
        .route("/api/auth/logout", post(handlers::logout::<C>))
        .route("/api/auth/me", get(handlers::current_user::<C>))
        .route("/healthz", get(handlers::healthz))
        .fallback(handlers::not_found)
        .layer(middleware::from_fn(guard::edge_guard))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
