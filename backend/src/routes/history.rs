//! History, trend, CSV export and dashboard routes

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::services::HistoryService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use gym_freak_shared::types::{DashboardResponse, HistoryQuery, HistoryResponse, TrendQuery};

pub fn history_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_history))
        .route("/trend", get(get_trend))
        .route("/export.csv", get(export_csv))
}

pub fn dashboard_routes() -> Router<AppState> {
    Router::new().route("/:date", get(get_dashboard))
}

/// GET /api/history?start_date&end_date - Newest day first
async fn get_history(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let history = HistoryService::history(state.db(), auth.user_id, query.start_date, query.end_date).await?;
    Ok(Json(history))
}

/// GET /api/history/trend?end_date&days - Oldest day first
async fn get_trend(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<TrendQuery>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let trend = HistoryService::trend(state.db(), auth.user_id, query.end_date, query.days).await?;
    Ok(Json(trend))
}

/// GET /api/history/export.csv?start_date&end_date
async fn export_csv(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<HistoryQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let csv = HistoryService::export_csv(state.db(), auth.user_id, query.start_date, query.end_date).await?;

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/csv"));
    let disposition = format!(
        "attachment; filename=\"gym-freak-{}-{}.csv\"",
        query.start_date, query.end_date
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition)
            .unwrap_or_else(|_| HeaderValue::from_static("attachment; filename=\"gym-freak-history.csv\"")),
    );

    Ok((headers, csv))
}

/// GET /api/dashboard/:date
async fn get_dashboard(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(date): Path<NaiveDate>,
) -> Result<Json<DashboardResponse>, ApiError> {
    let dashboard = HistoryService::dashboard(state.db(), &auth, date).await?;
    Ok(Json(dashboard))
}
