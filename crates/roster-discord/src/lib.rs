//! # roster-discord
//!
//! Minimal Discord REST client used to keep guild roles in line with the
//! roster. Implements `roster_core::GuildGateway`.

pub mod client;
pub mod config;
pub mod error;
pub mod models;

pub use client::{DiscordClient, MAX_MEMBER_PAGE};
pub use config::DiscordClientConfig;
pub use error::DiscordError;
pub use models::{DiscordMember, DiscordUser};
