//! Authentication extractor
//!
//! Extracts and validates the session JWT from the Authorization header.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::response::ApiError;
use crate::state::AppState;

/// Admin authenticated by a session token
#[derive(Debug, Clone)]
pub struct AuthAdmin {
    pub admin_id: i64,
    pub email: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthAdmin
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::MissingAuth)?;

        let app_state = AppState::from_ref(state);

        let claims = app_state
            .jwt_service()
            .decode_token(bearer.token())
            .inspect_err(|e| tracing::warn!(error = %e, "Rejected session token"))?;

        let admin_id = claims.admin_id()?;

        Ok(AuthAdmin {
            admin_id,
            email: claims.email,
        })
    }
}
