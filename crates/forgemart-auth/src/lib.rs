//! Forgemart Auth: password verification, opaque session tokens, and
//! the session lifecycle service.
//!
//! Framework-agnostic by design: tokens come in as plain strings from
//! the transport layer and profiles go out as plain structs. Cookie
//! handling belongs to the HTTP crate.

pub mod config;
pub mod error;
pub mod password;
pub mod service;
pub mod token;

pub use config::SessionConfig;
pub use error::AuthError;
pub use service::{LoginOutput, SessionService};
