//! Food catalog and food log routes

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::services::FoodService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use gym_freak_shared::types::{FoodLogResponse, LogFoodRequest, SearchQuery};
use gym_freak_shared::{FoodEntry, FoodItem};
use uuid::Uuid;

pub fn food_routes() -> Router<AppState> {
    Router::new()
        .route("/search", get(search_foods))
        .route("/log", post(log_food))
        // GET takes a date, DELETE an entry id
        .route("/log/:key", get(get_food_log).delete(delete_food_entry))
}

/// GET /api/foods/search?q=
async fn search_foods(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<FoodItem>>, ApiError> {
    let items = FoodService::search(state.db(), query.q.as_deref()).await?;
    Ok(Json(items))
}

/// GET /api/foods/log/:date
async fn get_food_log(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(date): Path<NaiveDate>,
) -> Result<Json<FoodLogResponse>, ApiError> {
    let log = FoodService::daily_log(state.db(), auth.user_id, date).await?;
    Ok(Json(log))
}

/// POST /api/foods/log
async fn log_food(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<LogFoodRequest>,
) -> Result<(StatusCode, Json<FoodEntry>), ApiError> {
    let entry = FoodService::log_food(state.db(), &auth, req).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// DELETE /api/foods/log/:id
async fn delete_food_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    FoodService::delete_entry(state.db(), auth.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
