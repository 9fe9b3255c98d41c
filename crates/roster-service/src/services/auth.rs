//! Authentication service
//!
//! Handles admin login and the bootstrap admin created at startup.

use roster_common::auth::{validate_password_strength, PasswordService};
use roster_common::AppError;
use roster_core::DomainError;
use tracing::{info, instrument, warn};

use crate::dto::{AdminResponse, LoginRequest, LoginResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Authentication service
pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
    passwords: PasswordService,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self {
            ctx,
            passwords: PasswordService::new(),
        }
    }

    /// Login with email and password
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<LoginResponse> {
        let email = request.email.trim();

        let (admin, password_hash) = self
            .ctx
            .admin_repo()
            .find_credentials(email)
            .await?
            .ok_or_else(|| {
                warn!("Login failed: unknown admin");
                AppError::InvalidCredentials
            })?;

        self.passwords
            .verify_or_error(&request.password, &password_hash)
            .inspect_err(|_| warn!(admin_id = admin.id, "Login failed: invalid password"))?;

        let session = self.ctx.jwt_service().issue(admin.id, &admin.email)?;
        info!(admin_id = admin.id, "Admin logged in");

        Ok(LoginResponse {
            access_token: session.access_token,
            token_type: session.token_type,
            expires_in: session.expires_in,
            admin: AdminResponse::from(admin),
        })
    }

    /// Make sure an admin with `email` exists, creating it with `password`
    ///
    /// Returns `true` when the account was created. An existing account is
    /// left untouched, including its password.
    #[instrument(skip(self, password))]
    pub async fn ensure_admin(&self, email: &str, password: &str) -> ServiceResult<bool> {
        let email = email.trim();
        if self.ctx.admin_repo().find_credentials(email).await?.is_some() {
            return Ok(false);
        }

        validate_password_strength(password)?;
        let password_hash = self.passwords.hash(password)?;

        match self.ctx.admin_repo().create(email, &password_hash).await {
            Ok(admin) => {
                info!(admin_id = admin.id, "Bootstrap admin created");
                Ok(true)
            }
            Err(DomainError::AdminEmailExists) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Look up the admin a session belongs to
    #[instrument(skip(self))]
    pub async fn current_admin(&self, admin_id: i64) -> ServiceResult<AdminResponse> {
        let admin = self
            .ctx
            .admin_repo()
            .find_by_id(admin_id)
            .await?
            .ok_or(DomainError::AdminNotFound)?;
        Ok(admin.into())
    }
}
