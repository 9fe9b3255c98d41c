//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, BootstrapAdminConfig, ConfigError, CorsConfig, DatabaseConfig,
    DiscordConfig, Environment, JwtConfig, RateLimitConfig, ServerConfig, SyncConfig,
};
