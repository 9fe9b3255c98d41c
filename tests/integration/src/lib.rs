//! Integration test utilities for the roster service
//!
//! Spawns the REST API against a live database and an in-process mock of the
//! Discord REST API.

pub mod fixtures;
pub mod helpers;
pub mod mock_discord;

pub use fixtures::*;
pub use helpers::*;
pub use mock_discord::MockDiscord;
