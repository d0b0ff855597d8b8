// crates/backend-lib/src/middleware/mod.rs

//! Request middleware for the session-gate API.

pub mod auth;

pub use auth::authenticate;
