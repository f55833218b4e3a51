//! Forgemart Core: domain models, repository traits, and shared errors
//! for the storefront session subsystem.
//!
//! This crate has no I/O and no framework dependencies; the store
//! implementations live in `forgemart-db` and the lifecycle logic in
//! `forgemart-auth`.

pub mod error;
pub mod models;
pub mod repository;
