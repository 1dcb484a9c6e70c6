//! History service - day aggregates, trends, CSV export and the dashboard

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::repositories::{FoodEntryRepository, WaterEntryRepository, WorkoutRepository};
use crate::services::ProfileService;
use chrono::{Duration, NaiveDate, Utc};
use gym_freak_shared::types::{DailyTotalsRow, DashboardResponse, HistoryResponse};
use gym_freak_shared::validation::{validate_date_range, MAX_HISTORY_DAYS};
use gym_freak_shared::{
    aggregate_food_log, aggregate_history, remaining_calories, sum_burned, sum_water, DayAggregate,
    DayHistory, FoodEntry, WaterEntry, Workout,
};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

/// Trailing window used by the trend view when none is requested
pub const DEFAULT_TREND_DAYS: u32 = 7;

/// Raw entries for a date range
struct RangeEntries {
    foods: Vec<FoodEntry>,
    workouts: Vec<Workout>,
    water: Vec<WaterEntry>,
}

pub struct HistoryService;

impl HistoryService {
    async fn fetch_range(
        db: &PgPool,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RangeEntries, ApiError> {
        let (foods, workouts, water) = tokio::try_join!(
            FoodEntryRepository::get_by_date_range(db, user_id, start, end),
            WorkoutRepository::get_by_date_range(db, user_id, start, end),
            WaterEntryRepository::get_by_date_range(db, user_id, start, end),
        )
        .map_err(ApiError::Internal)?;

        let workouts = workouts
            .into_iter()
            .map(|record| Workout::try_from(record).map_err(|e| ApiError::Internal(e.into())))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RangeEntries {
            foods: foods.into_iter().map(FoodEntry::from).collect(),
            workouts,
            water: water.into_iter().map(WaterEntry::from).collect(),
        })
    }

    async fn day_history(
        db: &PgPool,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<DayHistory, ApiError> {
        validate_date_range(start, end).map_err(ApiError::Validation)?;
        let entries = Self::fetch_range(db, user_id, start, end).await?;
        Ok(aggregate_history(
            &entries.foods,
            &entries.workouts,
            &entries.water,
            start,
            end,
        ))
    }

    /// Days with any logged entry in `[start, end]`, newest first
    pub async fn history(
        db: &PgPool,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<HistoryResponse, ApiError> {
        let history = Self::day_history(db, user_id, start, end).await?;
        Ok(HistoryResponse {
            start_date: start,
            end_date: end,
            days: history.into_descending(),
        })
    }

    /// First and last day of a trailing window ending at `end`
    pub fn trend_window(end: NaiveDate, days: Option<u32>) -> Result<(NaiveDate, NaiveDate), ApiError> {
        let days = days.unwrap_or(DEFAULT_TREND_DAYS);
        if days == 0 || i64::from(days) > MAX_HISTORY_DAYS {
            return Err(ApiError::Validation(format!(
                "Days must be between 1 and {}",
                MAX_HISTORY_DAYS
            )));
        }
        let start = end
            .checked_sub_signed(Duration::days(i64::from(days) - 1))
            .ok_or_else(|| ApiError::Validation("Date out of range".to_string()))?;
        Ok((start, end))
    }

    /// Trailing window for charts, oldest first
    pub async fn trend(
        db: &PgPool,
        user_id: Uuid,
        end: Option<NaiveDate>,
        days: Option<u32>,
    ) -> Result<HistoryResponse, ApiError> {
        let end = end.unwrap_or_else(|| Utc::now().date_naive());
        let (start, end) = Self::trend_window(end, days)?;
        let history = Self::day_history(db, user_id, start, end).await?;
        Ok(HistoryResponse {
            start_date: start,
            end_date: end,
            days: history.into_chronological(),
        })
    }

    pub fn totals_row(day: &DayAggregate) -> DailyTotalsRow {
        DailyTotalsRow {
            date: day.date,
            calories: round_tenth(day.totals.calories),
            protein: round_tenth(day.totals.protein),
            carbs: round_tenth(day.totals.carbs),
            fat: round_tenth(day.totals.fat),
            burned: day.totals.burned,
            net_calories: round_tenth(day.net_calories()),
            water_ml: day.totals.water,
            food_entries: day.foods.len(),
            workouts: day.workouts.len(),
        }
    }

    /// Per-day totals as CSV, oldest day first
    pub async fn export_csv(
        db: &PgPool,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<String, ApiError> {
        let history = Self::day_history(db, user_id, start, end).await?;
        let rows: Vec<DailyTotalsRow> = history.into_chronological().iter().map(Self::totals_row).collect();
        Self::to_csv(&rows)
    }

    fn to_csv<T: Serialize>(data: &[T]) -> Result<String, ApiError> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record)
                .map_err(|e| ApiError::Internal(anyhow::anyhow!("CSV serialization error: {}", e)))?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| ApiError::Internal(anyhow::anyhow!("CSV flush error: {}", e)))?;
        String::from_utf8(bytes).map_err(|e| ApiError::Internal(anyhow::anyhow!("CSV encoding error: {}", e)))
    }

    /// One day's targets, intake and burn
    pub async fn dashboard(db: &PgPool, auth: &AuthUser, date: NaiveDate) -> Result<DashboardResponse, ApiError> {
        let user_id = auth.user_id;
        let (user, foods, workouts, water) = tokio::try_join!(
            ProfileService::get_or_provision(db, auth),
            async {
                FoodEntryRepository::get_by_date(db, user_id, date)
                    .await
                    .map_err(ApiError::Internal)
            },
            async {
                WorkoutRepository::get_by_date(db, user_id, date)
                    .await
                    .map_err(ApiError::Internal)
            },
            async {
                WaterEntryRepository::get_by_date(db, user_id, date)
                    .await
                    .map_err(ApiError::Internal)
            },
        )?;

        let foods: Vec<FoodEntry> = foods.into_iter().map(FoodEntry::from).collect();
        let workouts = workouts
            .into_iter()
            .map(|record| Workout::try_from(record).map_err(|e| ApiError::Internal(e.into())))
            .collect::<Result<Vec<_>, _>>()?;
        let water: Vec<WaterEntry> = water.into_iter().map(WaterEntry::from).collect();

        let metrics = ProfileService::metrics_for(&user);
        let consumed = aggregate_food_log(&foods).totals;
        let burned = sum_burned(&workouts);

        Ok(DashboardResponse {
            date,
            targets: metrics.targets,
            remaining: remaining_calories(metrics.targets.calories, consumed.calories, burned),
            user,
            metrics,
            consumed,
            burned,
            water: sum_water(&water),
        })
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
