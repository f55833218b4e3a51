//! Forgemart Server: the HTTP surface for the storefront session core.
//!
//! Route handlers, the edge route guard, and router assembly live
//! here; `main.rs` wires configuration, the store, and the background
//! sweep together.

pub mod config;
pub mod guard;
pub mod handlers;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use routes::create_app;
pub use state::{AppState, CookiePolicy};
