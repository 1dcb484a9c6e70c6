//! Exercise catalog and workout log routes

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::services::WorkoutService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use gym_freak_shared::types::{LogWorkoutRequest, SearchQuery, WorkoutLogResponse};
use gym_freak_shared::{Exercise, Workout};
use uuid::Uuid;

pub fn workout_routes() -> Router<AppState> {
    Router::new()
        .route("/search", get(search_exercises))
        .route("/log", post(log_workout))
        // GET takes a date, DELETE a workout id
        .route("/log/:key", get(get_workout_log).delete(delete_workout))
}

/// GET /api/workouts/search?q=
async fn search_exercises(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Exercise>>, ApiError> {
    let items = WorkoutService::search(state.db(), query.q.as_deref()).await?;
    Ok(Json(items))
}

/// GET /api/workouts/log/:date
async fn get_workout_log(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(date): Path<NaiveDate>,
) -> Result<Json<WorkoutLogResponse>, ApiError> {
    let log = WorkoutService::daily_log(state.db(), auth.user_id, date).await?;
    Ok(Json(log))
}

/// POST /api/workouts/log - Persist a workout with its estimated burn
async fn log_workout(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<LogWorkoutRequest>,
) -> Result<(StatusCode, Json<Workout>), ApiError> {
    let workout = WorkoutService::log_workout(state.db(), &auth, req).await?;
    Ok((StatusCode::CREATED, Json(workout)))
}

/// DELETE /api/workouts/log/:id
async fn delete_workout(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    WorkoutService::delete_workout(state.db(), auth.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
