//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file when present).

use std::env;
use std::fmt;

use roster_core::{DepartmentRoleMap, Snowflake};
use serde::Deserialize;

use crate::auth::SharedSecret;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub discord: DiscordConfig,
    pub sync: SyncConfig,
    pub bootstrap_admin: Option<BootstrapAdminConfig>,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Apply pending migrations at startup
    #[serde(default = "default_true")]
    pub run_migrations: bool,
}

/// JWT session configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: SharedSecret,
    /// Session lifetime in seconds
    pub session_expiry: i64,
}

/// Discord REST API configuration
#[derive(Clone)]
pub struct DiscordConfig {
    /// Bot token; empty means Discord calls fail with a configuration error
    pub bot_token: String,
    /// Application id used for interaction webhooks
    pub application_id: Option<Snowflake>,
    /// Guild used when a sync request does not name one
    pub guild_id: Option<Snowflake>,
    pub api_base: String,
    /// Members requested per page when listing a guild (1-1000)
    pub page_size: u16,
    pub timeout_secs: u64,
    pub roles: DepartmentRoleMap,
}

impl fmt::Debug for DiscordConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscordConfig")
            .field("bot_token", &if self.bot_token.is_empty() { "<unset>" } else { "<redacted>" })
            .field("application_id", &self.application_id)
            .field("guild_id", &self.guild_id)
            .field("api_base", &self.api_base)
            .field("page_size", &self.page_size)
            .field("timeout_secs", &self.timeout_secs)
            .field("roles", &self.roles)
            .finish()
    }
}

/// Machine-to-machine sync endpoint configuration
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Shared secret callers of the role endpoints must present
    pub secret_key: SharedSecret,
}

/// Admin account ensured at startup
#[derive(Clone)]
pub struct BootstrapAdminConfig {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for BootstrapAdminConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootstrapAdminConfig")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
    #[serde(default = "default_burst")]
    pub burst: u32,
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

// Default value functions
fn default_app_name() -> String {
    "roster-sync".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

fn default_session_expiry() -> i64 {
    28800 // 8 hours
}

fn default_discord_api_base() -> String {
    "https://discord.com/api/v10".to_string()
}

fn default_page_size() -> u16 {
    1000
}

fn default_discord_timeout() -> u64 {
    15
}

fn default_requests_per_second() -> u32 {
    10
}

fn default_burst() -> u32 {
    50
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or malformed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    ///
    /// Used by `from_env` and by tests that must not touch the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars { lookup: &lookup };

        let roles = DepartmentRoleMap::new(
            vars.required_snowflake("DISCORD_ROLE_TECHNICAL")?,
            vars.required_snowflake("DISCORD_ROLE_DESIGN")?,
            vars.required_snowflake("DISCORD_ROLE_MARKETING")?,
            vars.required_snowflake("DISCORD_ROLE_MANAGEMENT")?,
        )
        .map_err(|e| ConfigError::InvalidValue("DISCORD_ROLE_*", e.to_string()))?;

        let page_size: u16 = vars
            .parsed("DISCORD_MEMBER_PAGE_SIZE")?
            .unwrap_or_else(default_page_size);
        if !(1..=1000).contains(&page_size) {
            return Err(ConfigError::InvalidValue(
                "DISCORD_MEMBER_PAGE_SIZE",
                format!("{page_size} is outside 1-1000"),
            ));
        }

        let bootstrap_admin = match (vars.get("ADMIN_EMAIL"), vars.get("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(BootstrapAdminConfig { email, password }),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::MissingVar("ADMIN_PASSWORD")),
            (None, Some(_)) => return Err(ConfigError::MissingVar("ADMIN_EMAIL")),
        };

        Ok(Self {
            app: AppSettings {
                name: vars.get("APP_NAME").unwrap_or_else(default_app_name),
                env: vars
                    .get("APP_ENV")
                    .and_then(|s| Environment::parse(&s))
                    .unwrap_or_default(),
            },
            api: ServerConfig {
                host: vars.get("API_HOST").unwrap_or_else(default_host),
                port: vars.parsed("API_PORT")?.unwrap_or_else(default_port),
            },
            database: DatabaseConfig {
                url: vars.required("DATABASE_URL")?,
                max_connections: vars
                    .parsed("DATABASE_MAX_CONNECTIONS")?
                    .unwrap_or_else(default_max_connections),
                min_connections: vars
                    .parsed("DATABASE_MIN_CONNECTIONS")?
                    .unwrap_or_else(default_min_connections),
                run_migrations: vars
                    .parsed("DATABASE_RUN_MIGRATIONS")?
                    .unwrap_or_else(default_true),
            },
            jwt: JwtConfig {
                secret: SharedSecret::new(vars.required("JWT_SECRET")?),
                session_expiry: vars
                    .parsed("JWT_SESSION_EXPIRY")?
                    .unwrap_or_else(default_session_expiry),
            },
            discord: DiscordConfig {
                bot_token: vars.get("DISCORD_TOKEN").unwrap_or_default(),
                application_id: vars.optional_snowflake("DISCORD_APPLICATION_ID")?,
                guild_id: vars.optional_snowflake("DISCORD_GUILD_ID")?,
                api_base: vars
                    .get("DISCORD_API_BASE")
                    .map(|s| s.trim_end_matches('/').to_string())
                    .unwrap_or_else(default_discord_api_base),
                page_size,
                timeout_secs: vars
                    .parsed("DISCORD_TIMEOUT_SECS")?
                    .unwrap_or_else(default_discord_timeout),
                roles,
            },
            sync: SyncConfig {
                secret_key: SharedSecret::new(vars.required("SYNC_SECRET_KEY")?),
            },
            bootstrap_admin,
            rate_limit: RateLimitConfig {
                requests_per_second: vars
                    .parsed("RATE_LIMIT_REQUESTS_PER_SECOND")?
                    .unwrap_or_else(default_requests_per_second),
                burst: vars.parsed("RATE_LIMIT_BURST")?.unwrap_or_else(default_burst),
            },
            cors: CorsConfig {
                allowed_origins: vars
                    .get("CORS_ALLOWED_ORIGINS")
                    .map(|s| s.split(',').map(str::trim).map(String::from).collect())
                    .unwrap_or_default(),
            },
        })
    }
}

/// Typed access to a key lookup; blank values count as unset
struct Vars<'a, F> {
    lookup: &'a F,
}

impl<F> Vars<'_, F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|v| !v.trim().is_empty())
    }

    fn required(&self, key: &'static str) -> Result<String, ConfigError> {
        self.get(key).ok_or(ConfigError::MissingVar(key))
    }

    fn parsed<T: std::str::FromStr>(&self, key: &'static str) -> Result<Option<T>, ConfigError> {
        self.get(key)
            .map(|v| {
                v.trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue(key, v.clone()))
            })
            .transpose()
    }

    fn optional_snowflake(&self, key: &'static str) -> Result<Option<Snowflake>, ConfigError> {
        self.parsed::<Snowflake>(key)
    }

    fn required_snowflake(&self, key: &'static str) -> Result<Snowflake, ConfigError> {
        self.optional_snowflake(key)?.ok_or(ConfigError::MissingVar(key))
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
