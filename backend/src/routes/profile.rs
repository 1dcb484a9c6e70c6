//! User profile API routes

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::services::ProfileService;
use crate::state::AppState;
use axum::{extract::State, routing::get, Json, Router};
use gym_freak_shared::types::{ProfileResponse, UpdateProfileRequest};

pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/profile", get(get_profile).put(update_profile))
}

/// GET /api/user/profile - Profile plus derived metrics, provisioned on first call
async fn get_profile(State(state): State<AppState>, auth: AuthUser) -> Result<Json<ProfileResponse>, ApiError> {
    let response = ProfileService::get_profile(state.db(), &auth).await?;
    Ok(Json(response))
}

/// PUT /api/user/profile - Partial profile update
async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let response = ProfileService::update_profile(state.db(), &auth, req).await?;
    Ok(Json(response))
}
