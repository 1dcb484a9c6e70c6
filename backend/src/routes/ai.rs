//! AI text routes

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::services::{AiService, HistoryService, ProfileService};
use crate::state::AppState;
use axum::{extract::State, routing::post, Json, Router};
use chrono::Utc;
use gym_freak_shared::types::{
    CoachInsightRequest, CoachInsightResponse, EstimateRequest, FitnessPlanResponse, FoodEstimate,
    WorkoutEstimate,
};

pub fn ai_routes() -> Router<AppState> {
    Router::new()
        .route("/estimate-food", post(estimate_food))
        .route("/estimate-workout", post(estimate_workout))
        .route("/coach-insight", post(coach_insight))
        .route("/fitness-plan", post(fitness_plan))
}

/// POST /api/ai/estimate-food - 503 when the AI service is not configured
async fn estimate_food(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(req): Json<EstimateRequest>,
) -> Result<Json<FoodEstimate>, ApiError> {
    let estimate = AiService::estimate_food(state.ai(), req).await?;
    Ok(Json(estimate))
}

/// POST /api/ai/estimate-workout - 503 when the AI service is not configured
async fn estimate_workout(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(req): Json<EstimateRequest>,
) -> Result<Json<WorkoutEstimate>, ApiError> {
    let estimate = AiService::estimate_workout(state.ai(), req).await?;
    Ok(Json(estimate))
}

/// POST /api/ai/coach-insight - Body is optional; the date defaults to today
async fn coach_insight(
    State(state): State<AppState>,
    auth: AuthUser,
    body: Option<Json<CoachInsightRequest>>,
) -> Result<Json<CoachInsightResponse>, ApiError> {
    let date = body
        .and_then(|Json(req)| req.date)
        .unwrap_or_else(|| Utc::now().date_naive());

    let dashboard = HistoryService::dashboard(state.db(), &auth, date).await?;
    Ok(Json(AiService::coach_insight(state.ai(), &dashboard).await))
}

/// POST /api/ai/fitness-plan
async fn fitness_plan(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<FitnessPlanResponse>, ApiError> {
    let user = ProfileService::get_or_provision(state.db(), &auth).await?;
    let metrics = ProfileService::metrics_for(&user);
    Ok(Json(AiService::fitness_plan(state.ai(), &user, &metrics).await))
}
