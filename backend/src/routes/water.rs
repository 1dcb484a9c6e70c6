//! Water log routes

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::services::WaterService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use gym_freak_shared::types::{LogWaterRequest, WaterLogResponse};
use gym_freak_shared::WaterEntry;
use uuid::Uuid;

pub fn water_routes() -> Router<AppState> {
    Router::new()
        .route("/log", post(log_water))
        .route("/log/:key", get(get_water_log).delete(delete_water_entry))
}

async fn get_water_log(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(date): Path<NaiveDate>,
) -> Result<Json<WaterLogResponse>, ApiError> {
    let log = WaterService::daily_log(state.db(), auth.user_id, date).await?;
    Ok(Json(log))
}

async fn log_water(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<LogWaterRequest>,
) -> Result<(StatusCode, Json<WaterEntry>), ApiError> {
    let entry = WaterService::log_water(state.db(), &auth, req).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn delete_water_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    WaterService::delete_entry(state.db(), auth.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
