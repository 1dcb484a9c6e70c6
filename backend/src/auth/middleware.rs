//! Authentication extractor
//!
//! A missing bearer token is rejected with 401, a token that fails
//! verification with 403.
//!
//! # Performance
//!
//! Uses pre-computed JWT keys from AppState to avoid expensive
//! key derivation on every request.

use crate::auth::UserMetadata;
use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::FromRef,
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::debug;
use uuid::Uuid;

/// Authenticated user extracted from the provider token
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
    pub metadata: UserMetadata,
}

impl AuthUser {
    /// Name for a freshly provisioned profile: metadata name, else the email local part
    pub fn default_name(&self) -> String {
        self.metadata
            .display_name()
            .map(str::to_string)
            .unwrap_or_else(|| self.email.split('@').next().unwrap_or_default().to_string())
    }
}

/// Pull the token out of `Authorization: Bearer <token>`
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|header| header.split_whitespace().nth(1))
        .filter(|token| !token.is_empty())
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let token = bearer_token(parts)
            .ok_or_else(|| ApiError::Unauthorized("Missing token".to_string()))?;

        let claims = app_state.jwt().validate_token(token).map_err(|e| {
            debug!(error = %e, "Rejected bearer token");
            ApiError::Forbidden("Invalid token".to_string())
        })?;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| ApiError::Forbidden("Invalid token".to_string()))?;

        Ok(AuthUser {
            user_id,
            email: claims.email.unwrap_or_default(),
            metadata: claims.user_metadata,
        })
    }
}
