//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

use std::sync::Arc;

use axum::Router;
use roster_common::{AppConfig, AppError, JwtService};
use roster_db::{
    create_pool, migrations_dir, run_migrations, PgAdminRepository, PgMemberRepository, PoolConfig,
};
use roster_discord::{DiscordClient, DiscordClientConfig};
use roster_service::{AuthService, ServiceContextBuilder, SyncSettings};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::middleware::{apply_middleware, apply_middleware_with_config};
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
///
/// Health routes skip rate limiting.
pub fn create_app(state: AppState, config: &AppConfig) -> Result<Router, AppError> {
    let api = apply_middleware_with_config(
        create_router(),
        &config.rate_limit,
        &config.cors,
        config.app.env.is_production(),
    )
    .ok_or_else(|| {
        AppError::Config(format!(
            "invalid rate limit: {} requests/s, burst {}",
            config.rate_limit.requests_per_second, config.rate_limit.burst
        ))
    })?;

    Ok(api
        .merge(apply_middleware(health_routes()))
        .with_state(state))
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: &AppConfig) -> Result<AppState, AppError> {
    // Database
    info!("Connecting to PostgreSQL...");
    let pool = create_pool(&PoolConfig::from(&config.database))
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    if config.database.run_migrations {
        run_migrations(&pool, &migrations_dir())
            .await
            .map_err(|e| AppError::Database(format!("migration failed: {e}")))?;
    }

    // Discord
    let discord = DiscordClient::new(DiscordClientConfig::from(&config.discord))
        .map_err(|e| AppError::Config(e.to_string()))?;
    if config.discord.bot_token.is_empty() {
        warn!("DISCORD_TOKEN is not set; role sync requests will fail");
    }
    if config.discord.application_id.is_none() {
        warn!("DISCORD_APPLICATION_ID is not set; interaction replies will fail");
    }

    let jwt_service = Arc::new(JwtService::new(
        config.jwt.secret.expose(),
        config.jwt.session_expiry,
    ));

    let service_context = ServiceContextBuilder::new()
        .member_repo(Arc::new(PgMemberRepository::new(pool.clone())))
        .admin_repo(Arc::new(PgAdminRepository::new(pool.clone())))
        .gateway(Arc::new(discord))
        .role_map(config.discord.roles)
        .sync(SyncSettings {
            secret: config.sync.secret_key.clone(),
            default_guild: config.discord.guild_id,
            page_size: config.discord.page_size,
        })
        .jwt_service(jwt_service)
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    if let Some(admin) = &config.bootstrap_admin {
        let created = AuthService::new(&service_context)
            .ensure_admin(&admin.email, &admin.password)
            .await
            .map_err(AppError::from)?;
        if created {
            info!(email = %admin.email, "Bootstrap admin created");
        }
    }

    Ok(AppState::new(service_context, pool))
}

/// Run the HTTP server
pub async fn run_server(app: Router, address: &str) -> Result<(), AppError> {
    let listener = TcpListener::bind(address)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {address}: {e}")))?;

    info!("Server listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    info!("Server stopped");
    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let state = create_app_state(&config).await?;
    let app = create_app(state, &config)?;
    run_server(app, &config.api.address()).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
