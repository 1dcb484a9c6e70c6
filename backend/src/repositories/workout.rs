//! Workout log repository

use anyhow::Result;
use chrono::NaiveDate;
use gym_freak_shared::{DomainError, SetEntry, Workout};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use super::decimal_to_f64;

/// Workout row from the database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WorkoutRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub exercise_type: String,
    pub exercise_name: String,
    pub duration: Option<i32>,
    pub sets: Option<i32>,
    pub reps: Option<i32>,
    pub weight: Option<Decimal>,
    pub muscle_group: Option<String>,
    pub sets_data: Option<Json<Vec<SetEntry>>>,
    pub calories_burned: i32,
}

impl TryFrom<WorkoutRecord> for Workout {
    type Error = DomainError;

    fn try_from(r: WorkoutRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: r.id,
            user_id: r.user_id,
            date: r.date,
            exercise_type: r.exercise_type.parse()?,
            exercise_name: r.exercise_name,
            duration: r.duration,
            sets: r.sets,
            reps: r.reps,
            weight: r.weight.map(decimal_to_f64),
            muscle_group: r.muscle_group.and_then(|g| g.parse().ok()),
            sets_data: r.sets_data.map(|Json(sets)| sets),
            calories_burned: i64::from(r.calories_burned),
        })
    }
}

/// Input for persisting a workout with its computed burn
#[derive(Debug, Clone)]
pub struct CreateWorkout {
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub exercise_type: String,
    pub exercise_name: String,
    pub duration: Option<i32>,
    pub sets: Option<i32>,
    pub reps: Option<i32>,
    pub weight: Option<Decimal>,
    pub muscle_group: Option<String>,
    pub sets_data: Option<Vec<SetEntry>>,
    pub calories_burned: i32,
}

const WORKOUT_COLUMNS: &str = "id, user_id, date, type AS exercise_type, exercise_name, duration, \
     sets, reps, weight, muscle_group, sets_data, calories_burned";

pub struct WorkoutRepository;

impl WorkoutRepository {
    pub async fn create(db: &PgPool, input: CreateWorkout) -> Result<WorkoutRecord> {
        let workout = sqlx::query_as::<_, WorkoutRecord>(&format!(
            r#"
            INSERT INTO workouts (
                user_id, date, type, exercise_name, duration, sets, reps,
                weight, muscle_group, sets_data, calories_burned
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {WORKOUT_COLUMNS}
            "#
        ))
        .bind(input.user_id)
        .bind(input.date)
        .bind(&input.exercise_type)
        .bind(&input.exercise_name)
        .bind(input.duration)
        .bind(input.sets)
        .bind(input.reps)
        .bind(input.weight)
        .bind(&input.muscle_group)
        .bind(input.sets_data.map(Json))
        .bind(input.calories_burned)
        .fetch_one(db)
        .await?;

        Ok(workout)
    }

    pub async fn get_by_date(db: &PgPool, user_id: Uuid, date: NaiveDate) -> Result<Vec<WorkoutRecord>> {
        let workouts = sqlx::query_as::<_, WorkoutRecord>(&format!(
            r#"
            SELECT {WORKOUT_COLUMNS}
            FROM workouts
            WHERE user_id = $1 AND date = $2
            ORDER BY created_at ASC
            "#
        ))
        .bind(user_id)
        .bind(date)
        .fetch_all(db)
        .await?;

        Ok(workouts)
    }

    /// Workouts in `[start, end]`, newest date first
    pub async fn get_by_date_range(
        db: &PgPool,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<WorkoutRecord>> {
        let workouts = sqlx::query_as::<_, WorkoutRecord>(&format!(
            r#"
            SELECT {WORKOUT_COLUMNS}
            FROM workouts
            WHERE user_id = $1 AND date >= $2 AND date <= $3
            ORDER BY date DESC, created_at ASC
            "#
        ))
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(db)
        .await?;

        Ok(workouts)
    }

    pub async fn delete(db: &PgPool, user_id: Uuid, workout_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM workouts WHERE id = $1 AND user_id = $2")
            .bind(workout_id)
            .bind(user_id)
            .execute(db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
