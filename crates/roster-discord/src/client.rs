//! Discord REST client
//!
//! Role changes are read-modify-write: the member is fetched, the role list
//! edited locally and the full list written back. There is no concurrency
//! token, so a change made between the two calls is overwritten. Requests are
//! not retried.

use async_trait::async_trait;
use reqwest::{IntoUrl, Method, RequestBuilder, Response, Url};
use serde_json::Value;
use tracing::{debug, instrument};

use roster_core::traits::{GuildGateway, RepoResult};
use roster_core::{is_valid_interaction_token, GuildMemberSnapshot, Snowflake};

use crate::config::DiscordClientConfig;
use crate::error::DiscordError;
use crate::models::{DiscordMember, InteractionEdit, ModifyMemberRoles};

const USER_AGENT: &str = concat!("DiscordBot (roster-sync, ", env!("CARGO_PKG_VERSION"), ")");

/// Largest page `GET guilds/{guild}/members` accepts
pub const MAX_MEMBER_PAGE: u16 = 1000;

/// Thin client over the Discord REST API
#[derive(Clone)]
pub struct DiscordClient {
    http: reqwest::Client,
    api_base: String,
    bot_token: String,
    application_id: Option<Snowflake>,
}

impl DiscordClient {
    /// Build a client from configuration
    ///
    /// An empty token is accepted here and reported on first use, so the
    /// service can start without Discord credentials.
    pub fn new(config: DiscordClientConfig) -> Result<Self, DiscordError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| DiscordError::Configuration(e.to_string()))?;

        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            bot_token: config.bot_token,
            application_id: config.application_id,
        })
    }

    /// Fetch one guild member
    #[instrument(skip_all, fields(guild_id = %guild_id, user_id = %user_id))]
    pub async fn get_member(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
    ) -> Result<DiscordMember, DiscordError> {
        require_ids(&[("guild", guild_id), ("user", user_id)])?;

        let path = format!("guilds/{guild_id}/members/{user_id}");
        let response = self.send(self.request(Method::GET, &path)?).await?;
        let response = check_status(response, Stage::Fetch).await?;
        decode_json(response).await
    }

    /// List up to `limit` guild members with a user id greater than `after`
    #[instrument(skip_all, fields(guild_id = %guild_id))]
    pub async fn list_members(
        &self,
        guild_id: Snowflake,
        limit: u16,
        after: Option<Snowflake>,
    ) -> Result<Vec<DiscordMember>, DiscordError> {
        require_ids(&[("guild", guild_id)])?;

        let limit = limit.clamp(1, MAX_MEMBER_PAGE);
        let mut query = vec![("limit", limit.to_string())];
        if let Some(after) = after {
            query.push(("after", after.to_string()));
        }

        let path = format!("guilds/{guild_id}/members");
        let request = self.request(Method::GET, &path)?.query(&query);
        let response = check_status(self.send(request).await?, Stage::Fetch).await?;
        let members: Vec<DiscordMember> = decode_json(response).await?;

        debug!(count = members.len(), "Fetched guild member page");
        Ok(members)
    }

    /// Replace the member's role list
    #[instrument(skip_all, fields(guild_id = %guild_id, user_id = %user_id, count = roles.len()))]
    pub async fn set_roles(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        roles: &[Snowflake],
    ) -> Result<DiscordMember, DiscordError> {
        require_ids(&[("guild", guild_id), ("user", user_id)])?;

        let path = format!("guilds/{guild_id}/members/{user_id}");
        let request = self
            .request(Method::PATCH, &path)?
            .json(&ModifyMemberRoles { roles });
        let response = check_status(self.send(request).await?, Stage::Update).await?;

        let body = read_body(response).await?;
        if body.trim().is_empty() {
            // 204: Discord accepted the list without echoing the member
            return Ok(DiscordMember {
                user: crate::models::DiscordUser {
                    id: user_id,
                    username: None,
                },
                nick: None,
                roles: roles.to_vec(),
            });
        }
        serde_json::from_str(&body).map_err(|e| DiscordError::InvalidResponse(e.to_string()))
    }

    /// Give a role to a member, keeping every role already held
    #[instrument(skip_all, fields(guild_id = %guild_id, user_id = %user_id, role_id = %role_id))]
    pub async fn add_role(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
    ) -> Result<DiscordMember, DiscordError> {
        require_ids(&[("guild", guild_id), ("user", user_id), ("role", role_id)])?;
        self.ensure_token()?;

        let current = GuildMemberSnapshot::from(self.get_member(guild_id, user_id).await?);
        let updated = self
            .set_roles(guild_id, user_id, &current.roles_with(role_id))
            .await?;

        debug!("Role added");
        Ok(updated)
    }

    /// Take a role from a member, keeping every other role
    #[instrument(skip_all, fields(guild_id = %guild_id, user_id = %user_id, role_id = %role_id))]
    pub async fn remove_role(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
    ) -> Result<DiscordMember, DiscordError> {
        require_ids(&[("guild", guild_id), ("user", user_id), ("role", role_id)])?;
        self.ensure_token()?;

        let current = GuildMemberSnapshot::from(self.get_member(guild_id, user_id).await?);
        let updated = self
            .set_roles(guild_id, user_id, &current.roles_without(role_id))
            .await?;

        debug!("Role removed");
        Ok(updated)
    }

    /// Edit the original message of an interaction
    ///
    /// Returns Discord's JSON body, or `Value::Null` when the body is empty.
    #[instrument(skip_all)]
    pub async fn edit_interaction_response(
        &self,
        interaction_token: &str,
        content: &str,
    ) -> Result<Value, DiscordError> {
        let application_id = self
            .application_id
            .filter(|id| !id.is_zero())
            .ok_or_else(|| {
                DiscordError::Configuration("application id is not configured".to_string())
            })?;
        if !is_valid_interaction_token(interaction_token) {
            return Err(DiscordError::InvalidArgument(
                "interaction token must be a non-empty run of letters, digits, '.', '_' or '-'"
                    .to_string(),
            ));
        }

        let url = self.endpoint(&[
            "webhooks",
            &application_id.to_string(),
            interaction_token,
        ])?;
        let request = self
            .authorized(Method::PATCH, url)?
            .json(&InteractionEdit::new(content));
        let response = check_status(self.send(request).await?, Stage::Update).await?;

        let body = read_body(response).await?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| DiscordError::InvalidResponse(e.to_string()))
    }

    fn ensure_token(&self) -> Result<(), DiscordError> {
        if self.bot_token.trim().is_empty() {
            return Err(DiscordError::Configuration(
                "bot token is not configured".to_string(),
            ));
        }
        Ok(())
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, DiscordError> {
        let url = format!("{}/{}", self.api_base, path.trim_start_matches('/'));
        self.authorized(method, url)
    }

    /// Base URL extended by `segments`, each percent-encoded as one path segment
    fn endpoint(&self, segments: &[&str]) -> Result<Url, DiscordError> {
        let mut url = Url::parse(&self.api_base)
            .map_err(|e| DiscordError::Configuration(format!("invalid api base: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| {
                DiscordError::Configuration("api base cannot carry a path".to_string())
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorized(
        &self,
        method: Method,
        url: impl IntoUrl,
    ) -> Result<RequestBuilder, DiscordError> {
        self.ensure_token()?;
        Ok(self
            .http
            .request(method, url)
            .header(reqwest::header::AUTHORIZATION, format!("Bot {}", self.bot_token)))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, DiscordError> {
        request
            .send()
            .await
            .map_err(|e| DiscordError::Transport(e.to_string()))
    }
}

impl std::fmt::Debug for DiscordClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordClient")
            .field("api_base", &self.api_base)
            .field("application_id", &self.application_id)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl GuildGateway for DiscordClient {
    async fn list_members(
        &self,
        guild_id: Snowflake,
        limit: u16,
        after: Option<Snowflake>,
    ) -> RepoResult<Vec<GuildMemberSnapshot>> {
        let members = DiscordClient::list_members(self, guild_id, limit, after).await?;
        Ok(members.into_iter().map(GuildMemberSnapshot::from).collect())
    }

    async fn add_role(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
    ) -> RepoResult<GuildMemberSnapshot> {
        Ok(DiscordClient::add_role(self, guild_id, user_id, role_id)
            .await?
            .into())
    }

    async fn remove_role(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
    ) -> RepoResult<GuildMemberSnapshot> {
        Ok(DiscordClient::remove_role(self, guild_id, user_id, role_id)
            .await?
            .into())
    }

    async fn edit_interaction_response(
        &self,
        interaction_token: &str,
        content: &str,
    ) -> RepoResult<Value> {
        Ok(DiscordClient::edit_interaction_response(self, interaction_token, content).await?)
    }
}

/// Which half of a read-modify-write a response belongs to
#[derive(Debug, Clone, Copy)]
enum Stage {
    Fetch,
    Update,
}

fn require_ids(ids: &[(&str, Snowflake)]) -> Result<(), DiscordError> {
    match ids.iter().find(|(_, id)| id.is_zero()) {
        Some((name, _)) => Err(DiscordError::Configuration(format!("{name} id is required"))),
        None => Ok(()),
    }
}

async fn check_status(response: Response, stage: Stage) -> Result<Response, DiscordError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let status = status.as_u16();
    Err(match stage {
        Stage::Fetch => DiscordError::Fetch { status, body },
        Stage::Update => DiscordError::Update { status, body },
    })
}

async fn read_body(response: Response) -> Result<String, DiscordError> {
    response
        .text()
        .await
        .map_err(|e| DiscordError::Transport(e.to_string()))
}

async fn decode_json<T: serde::de::DeserializeOwned>(
    response: Response,
) -> Result<T, DiscordError> {
    let body = read_body(response).await?;
    serde_json::from_str(&body).map_err(|e| DiscordError::InvalidResponse(e.to_string()))
}
