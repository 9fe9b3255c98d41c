//! Service context - dependency container for services
//!
//! Holds the repositories, the Discord gateway, session tokens and the
//! department role mapping needed by services.

use std::sync::Arc;

use roster_common::auth::{JwtService, SharedSecret};
use roster_core::traits::{AdminRepository, GuildGateway, MemberRepository};
use roster_core::{DepartmentRoleMap, Snowflake};

use super::error::{ServiceError, ServiceResult};

/// Settings for the role sync endpoints
#[derive(Debug, Clone)]
pub struct SyncSettings {
    /// Key callers of the role endpoints must present
    pub secret: SharedSecret,
    /// Guild used when a request does not name one
    pub default_guild: Option<Snowflake>,
    /// Guild members requested per page
    pub page_size: u16,
}

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    member_repo: Arc<dyn MemberRepository>,
    admin_repo: Arc<dyn AdminRepository>,

    // Discord
    gateway: Arc<dyn GuildGateway>,
    role_map: DepartmentRoleMap,
    sync: SyncSettings,

    // Services
    jwt_service: Arc<JwtService>,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        member_repo: Arc<dyn MemberRepository>,
        admin_repo: Arc<dyn AdminRepository>,
        gateway: Arc<dyn GuildGateway>,
        role_map: DepartmentRoleMap,
        sync: SyncSettings,
        jwt_service: Arc<JwtService>,
    ) -> Self {
        Self {
            member_repo,
            admin_repo,
            gateway,
            role_map,
            sync,
            jwt_service,
        }
    }

    // === Repositories ===

    /// Get the member repository
    pub fn member_repo(&self) -> &dyn MemberRepository {
        self.member_repo.as_ref()
    }

    /// Get the admin repository
    pub fn admin_repo(&self) -> &dyn AdminRepository {
        self.admin_repo.as_ref()
    }

    // === Discord ===

    /// Get the Discord gateway
    pub fn gateway(&self) -> &dyn GuildGateway {
        self.gateway.as_ref()
    }

    /// Department to role mapping
    pub fn role_map(&self) -> &DepartmentRoleMap {
        &self.role_map
    }

    /// Role sync settings
    pub fn sync(&self) -> &SyncSettings {
        &self.sync
    }

    // === Services ===

    /// Get the JWT service
    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("gateway", &"dyn GuildGateway")
            .field("role_map", &self.role_map)
            .field("sync", &self.sync)
            .finish_non_exhaustive()
    }
}

/// Builder for creating ServiceContext
#[derive(Default)]
pub struct ServiceContextBuilder {
    member_repo: Option<Arc<dyn MemberRepository>>,
    admin_repo: Option<Arc<dyn AdminRepository>>,
    gateway: Option<Arc<dyn GuildGateway>>,
    role_map: Option<DepartmentRoleMap>,
    sync: Option<SyncSettings>,
    jwt_service: Option<Arc<JwtService>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn member_repo(mut self, repo: Arc<dyn MemberRepository>) -> Self {
        self.member_repo = Some(repo);
        self
    }

    pub fn admin_repo(mut self, repo: Arc<dyn AdminRepository>) -> Self {
        self.admin_repo = Some(repo);
        self
    }

    pub fn gateway(mut self, gateway: Arc<dyn GuildGateway>) -> Self {
        self.gateway = Some(gateway);
        self
    }

    pub fn role_map(mut self, role_map: DepartmentRoleMap) -> Self {
        self.role_map = Some(role_map);
        self
    }

    pub fn sync(mut self, sync: SyncSettings) -> Self {
        self.sync = Some(sync);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        let sync = self
            .sync
            .ok_or_else(|| ServiceError::validation("sync settings are required"))?;
        if sync.page_size == 0 {
            return Err(ServiceError::validation("sync page size must be positive"));
        }

        Ok(ServiceContext::new(
            self.member_repo
                .ok_or_else(|| ServiceError::validation("member_repo is required"))?,
            self.admin_repo
                .ok_or_else(|| ServiceError::validation("admin_repo is required"))?,
            self.gateway
                .ok_or_else(|| ServiceError::validation("gateway is required"))?,
            self.role_map
                .ok_or_else(|| ServiceError::validation("role_map is required"))?,
            sync,
            self.jwt_service
                .ok_or_else(|| ServiceError::validation("jwt_service is required"))?,
        ))
    }
}
