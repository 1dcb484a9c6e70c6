//! Profile service - provisioning, updates and derived metrics

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::repositories::{f64_to_decimal, ProfileRepository, UpdateProfile};
use gym_freak_shared::types::{ProfileResponse, UpdateProfileRequest};
use gym_freak_shared::validation::{labelled, validate_age, validate_height_cm, validate_weight};
use gym_freak_shared::{compute_metrics, DerivedMetrics, MetricsProfile, User};
use sqlx::PgPool;
use validator::Validate;

/// Profile service
pub struct ProfileService;

impl ProfileService {
    /// Load the caller's profile, creating it from token data on first use
    pub async fn get_or_provision(db: &PgPool, auth: &AuthUser) -> Result<User, ApiError> {
        let name = auth.default_name();
        let user = ProfileRepository::ensure_exists(db, auth.user_id, &auth.email, Some(name.as_str()))
            .await
            .map_err(ApiError::Internal)?;
        Ok(user.into())
    }

    pub async fn get_profile(db: &PgPool, auth: &AuthUser) -> Result<ProfileResponse, ApiError> {
        let user = Self::get_or_provision(db, auth).await?;
        let metrics = Self::metrics_for(&user);
        Ok(ProfileResponse { user, metrics })
    }

    fn validate_profile_update(req: &UpdateProfileRequest) -> Result<(), ApiError> {
        req.validate()?;

        if let Some(weight) = req.weight {
            validate_weight(weight).map_err(|msg| ApiError::Validation(labelled("weight", &msg)))?;
        }
        if let Some(height) = req.height {
            validate_height_cm(height).map_err(|msg| ApiError::Validation(labelled("height", &msg)))?;
        }
        if let Some(age) = req.age {
            validate_age(age).map_err(|msg| ApiError::Validation(labelled("age", &msg)))?;
        }

        Ok(())
    }

    /// Validate and apply a partial update; absent fields are kept
    pub async fn update_profile(
        db: &PgPool,
        auth: &AuthUser,
        req: UpdateProfileRequest,
    ) -> Result<ProfileResponse, ApiError> {
        Self::validate_profile_update(&req)?;
        Self::get_or_provision(db, auth).await?;

        let updates = UpdateProfile {
            name: req.name.map(|n| n.trim().to_string()),
            age: req.age,
            gender: req.gender.map(|g| g.as_str().to_string()),
            height: req.height.map(f64_to_decimal),
            weight: req.weight.map(f64_to_decimal),
            activity_level: req.activity_level.map(|a| a.as_str().to_string()),
            goal: req.goal.map(|g| g.as_str().to_string()),
        };

        let user: User = ProfileRepository::update(db, auth.user_id, updates)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))?
            .into();

        let metrics = Self::metrics_for(&user);
        Ok(ProfileResponse { user, metrics })
    }

    /// Formula inputs from a stored profile; unrecognised text values count as missing
    pub fn metrics_profile(user: &User) -> MetricsProfile {
        MetricsProfile {
            weight_kg: user.weight,
            height_cm: user.height,
            age_years: user.age,
            gender: user.gender.as_deref().and_then(|g| g.parse().ok()),
            activity_level: user.activity_level.as_deref().and_then(|a| a.parse().ok()),
            goal: user.goal.as_deref().and_then(|g| g.parse().ok()),
        }
    }

    pub fn metrics_for(user: &User) -> DerivedMetrics {
        compute_metrics(&Self::metrics_profile(user))
    }
}
