//! Axum extractors for request handling
//!
//! Custom extractors for session authentication and JSON bodies.

mod auth;
mod validated;

pub use auth::AuthAdmin;
pub use validated::{JsonBody, ValidatedJson};
