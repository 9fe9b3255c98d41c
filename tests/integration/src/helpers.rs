//! Test helpers for integration tests
//!
//! Spawns the API against the database named by `DATABASE_URL` with Discord
//! pointed at a [`MockDiscord`], and wraps the HTTP calls tests make.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use reqwest::{Client, Response, StatusCode};
use roster_api::{create_app, create_app_state};
use roster_common::AppConfig;
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::fixtures::{
    unique_admin_email, LoginRequest, LoginResponse, ADMIN_PASSWORD, APPLICATION_ID,
    DESIGN_ROLE, GUILD_ID, MANAGEMENT_ROLE, MARKETING_ROLE, SYNC_KEY, TECHNICAL_ROLE,
};
use crate::mock_discord::{MockDiscord, MOCK_BOT_TOKEN};

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    pub admin_email: String,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server whose Discord calls go to `discord`
    pub async fn start(discord: &MockDiscord) -> Result<Self> {
        let admin_email = unique_admin_email();
        let config = test_config(&discord.base_url(), &admin_email)?;

        let state = create_app_state(&config).await?;
        let app = create_app(state, &config)?;

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            admin_email,
            handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    /// Log in as the bootstrap admin and return the access token
    pub async fn login(&self) -> Result<String> {
        let response = self
            .post(
                "/auth/login",
                &LoginRequest {
                    email: self.admin_email.clone(),
                    password: ADMIN_PASSWORD.to_string(),
                },
            )
            .await?;
        let session: LoginResponse = assert_json(response, StatusCode::OK).await?;
        Ok(session.access_token)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        Ok(self.client.get(self.url(path)).send().await?)
    }

    /// Make a GET request with auth token
    pub async fn get_auth(&self, path: &str, token: &str) -> Result<Response> {
        Ok(self
            .client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await?)
    }

    /// Make a POST request with JSON body
    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        Ok(self.client.post(self.url(path)).json(body).send().await?)
    }

    /// Make a POST request with auth token
    pub async fn post_auth<T: Serialize>(
        &self,
        path: &str,
        token: &str,
        body: &T,
    ) -> Result<Response> {
        Ok(self
            .client
            .post(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?)
    }

    /// POST a plain-text body with auth token
    pub async fn post_text_auth(&self, path: &str, token: &str, body: String) -> Result<Response> {
        Ok(self
            .client
            .post(self.url(path))
            .bearer_auth(token)
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .body(body)
            .send()
            .await?)
    }

    /// Make a DELETE request with auth token
    pub async fn delete_auth(&self, path: &str, token: &str) -> Result<Response> {
        Ok(self
            .client
            .delete(self.url(path))
            .bearer_auth(token)
            .send()
            .await?)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Build the server configuration
///
/// Settings the tests depend on are fixed here; everything else, including
/// `DATABASE_URL`, comes from the environment.
pub fn test_config(discord_base: &str, admin_email: &str) -> Result<AppConfig> {
    dotenvy::dotenv().ok();

    let overrides = [
        ("DISCORD_API_BASE", discord_base.to_string()),
        ("DISCORD_TOKEN", MOCK_BOT_TOKEN.to_string()),
        ("DISCORD_APPLICATION_ID", APPLICATION_ID.to_string()),
        ("DISCORD_GUILD_ID", GUILD_ID.to_string()),
        ("DISCORD_ROLE_TECHNICAL", TECHNICAL_ROLE.to_string()),
        ("DISCORD_ROLE_DESIGN", DESIGN_ROLE.to_string()),
        ("DISCORD_ROLE_MARKETING", MARKETING_ROLE.to_string()),
        ("DISCORD_ROLE_MANAGEMENT", MANAGEMENT_ROLE.to_string()),
        ("SYNC_SECRET_KEY", SYNC_KEY.to_string()),
        ("ADMIN_EMAIL", admin_email.to_string()),
        ("ADMIN_PASSWORD", ADMIN_PASSWORD.to_string()),
        ("RATE_LIMIT_BURST", "1000".to_string()),
    ];

    let config = AppConfig::from_lookup(|key| {
        overrides
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.clone())
            .or_else(|| match key {
                "JWT_SECRET" => {
                    Some(std::env::var(key).unwrap_or_else(|_| "integration-jwt".to_string()))
                }
                _ => std::env::var(key).ok(),
            })
    })
    .map_err(|e| anyhow::anyhow!("Config error: {e}"))?;

    Ok(config)
}

/// Helper to check if test environment is available
pub fn check_test_env() -> bool {
    dotenvy::dotenv().ok();

    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("Skipping test: DATABASE_URL not set");
        return false;
    }

    true
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(())
}
