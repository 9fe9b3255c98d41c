//! Client configuration

use std::time::Duration;

use roster_core::Snowflake;

/// Settings for `DiscordClient`
#[derive(Clone)]
pub struct DiscordClientConfig {
    /// REST base URL without trailing slash, e.g. `https://discord.com/api/v10`
    pub api_base: String,
    /// Bot token sent as `Authorization: Bot <token>`
    pub bot_token: String,
    /// Application owning the interactions whose responses are edited
    pub application_id: Option<Snowflake>,
    /// Whole-request timeout
    pub timeout: Duration,
}

impl DiscordClientConfig {
    pub const DEFAULT_API_BASE: &'static str = "https://discord.com/api/v10";

    pub fn new(bot_token: impl Into<String>) -> Self {
        Self {
            api_base: Self::DEFAULT_API_BASE.to_string(),
            bot_token: bot_token.into(),
            application_id: None,
            timeout: Duration::from_secs(15),
        }
    }
}

impl From<&roster_common::DiscordConfig> for DiscordClientConfig {
    fn from(config: &roster_common::DiscordConfig) -> Self {
        Self {
            api_base: config.api_base.clone(),
            bot_token: config.bot_token.clone(),
            application_id: config.application_id,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

impl std::fmt::Debug for DiscordClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordClientConfig")
            .field("api_base", &self.api_base)
            .field("application_id", &self.application_id)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
