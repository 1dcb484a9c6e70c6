//! Identity provider token verification
//!
//! Access tokens are issued by the hosted identity provider and signed with
//! the project's shared HS256 secret. The backend only verifies them; keys are
//! pre-computed once and shared through `AppState`.

use chrono::{Duration, Utc};
use gym_freak_shared::AuthError;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Profile hints the provider stores alongside the account
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

impl UserMetadata {
    /// Display name from metadata, if the provider has one
    pub fn display_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .or(self.full_name.as_deref())
            .map(str::trim)
            .filter(|n| !n.is_empty())
    }
}

/// JWT claims as issued by the identity provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    #[serde(default)]
    pub iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub user_metadata: UserMetadata,
}

/// Pre-computed JWT keys, expensive to create so cached in AppState
#[derive(Clone)]
struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl JwtKeys {
    fn new(secret: &str) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
        }
    }
}

/// Verifies provider tokens; can also mint them for tests and local tooling
#[derive(Clone)]
pub struct JwtService {
    keys: JwtKeys,
    validation: Arc<Validation>,
    audience: Option<String>,
}

impl JwtService {
    /// Create a new JWT service with pre-computed keys
    ///
    /// Call this once at application startup and store in AppState.
    pub fn new(secret: &str, audience: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        let audience = Some(audience.trim())
            .filter(|a| !a.is_empty())
            .map(str::to_string);
        match &audience {
            Some(aud) => validation.set_audience(&[aud.as_str()]),
            None => validation.validate_aud = false,
        }

        Self {
            keys: JwtKeys::new(secret),
            validation: Arc::new(validation),
            audience,
        }
    }

    /// Verify signature and expiry, returning the claims
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.keys.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            })
    }

    /// Mint a token the way the identity provider would
    pub fn issue_token(
        &self,
        user_id: Uuid,
        email: &str,
        metadata: UserMetadata,
        ttl_secs: i64,
    ) -> anyhow::Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (now + Duration::seconds(ttl_secs)).timestamp(),
            iat: now.timestamp(),
            aud: self.audience.clone(),
            email: Some(email.to_string()),
            role: Some("authenticated".to_string()),
            user_metadata: metadata,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.keys.encoding)
            .map_err(|e| anyhow::anyhow!("Failed to sign token: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_service() -> JwtService {
        JwtService::new("test-secret", "authenticated")
    }

    #[test]
    fn test_issue_and_validate_token() {
        let service = create_test_service();
        let user_id = Uuid::new_v4();
        let metadata = UserMetadata {
            name: Some("Sam".to_string()),
            full_name: None,
        };

        let token = service.issue_token(user_id, "sam@example.com", metadata, 3600).unwrap();
        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.email.as_deref(), Some("sam@example.com"));
        assert_eq!(claims.user_metadata.display_name(), Some("Sam"));
    }

    #[test]
    fn test_expired_token() {
        let service = create_test_service();
        let token = service
            .issue_token(Uuid::new_v4(), "a@b.co", UserMetadata::default(), -3600)
            .unwrap();

        assert_eq!(service.validate_token(&token).unwrap_err(), AuthError::TokenExpired);
    }

    #[test]
    fn test_invalid_token() {
        let service = create_test_service();
        assert_eq!(
            service.validate_token("invalid.token.here").unwrap_err(),
            AuthError::InvalidToken
        );
    }

    #[test]
    fn test_different_secret_rejected() {
        let issuer = JwtService::new("secret-a", "authenticated");
        let verifier = JwtService::new("secret-b", "authenticated");
        let token = issuer
            .issue_token(Uuid::new_v4(), "a@b.co", UserMetadata::default(), 3600)
            .unwrap();

        assert!(verifier.validate_token(&token).is_err());
    }

    #[test]
    fn test_audience_mismatch_rejected() {
        let issuer = JwtService::new("secret", "anon");
        let verifier = JwtService::new("secret", "authenticated");
        let token = issuer
            .issue_token(Uuid::new_v4(), "a@b.co", UserMetadata::default(), 3600)
            .unwrap();

        assert_eq!(verifier.validate_token(&token).unwrap_err(), AuthError::InvalidToken);
    }

    #[test]
    fn test_full_name_fallback() {
        let metadata = UserMetadata {
            name: None,
            full_name: Some("  Jordan Lee ".to_string()),
        };
        assert_eq!(metadata.display_name(), Some("Jordan Lee"));
        assert_eq!(UserMetadata::default().display_name(), None);
    }
}
