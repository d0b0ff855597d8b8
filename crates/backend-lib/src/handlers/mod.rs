// ============================
// crates/backend-lib/src/handlers/mod.rs
// ============================
//! HTTP handlers mounted under `/api/v1`.
pub mod index;
pub mod reset_password;
pub mod session_auth;
pub mod users;
