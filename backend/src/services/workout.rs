//! Workout service - exercise catalog, burn estimation and the workout log

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::repositories::{
    f64_to_decimal, CreateWorkout, ExerciseCatalogRepository, WorkoutRepository, SEARCH_LIMIT,
};
use crate::services::ProfileService;
use crate::telemetry;
use async_trait::async_trait;
use chrono::NaiveDate;
use gym_freak_shared::types::{LogWorkoutRequest, WorkoutLogResponse};
use gym_freak_shared::validation::{labelled, validate_duration_minutes, validate_met};
use gym_freak_shared::{
    estimate_calories_burned, sum_burned, BurnEstimate, BurnParams, Exercise, ExerciseType, MetLookup,
    Workout,
};
use sqlx::PgPool;
use tracing::{debug, warn};
use uuid::Uuid;
use validator::Validate;

// ============================================================================
// MET lookup
// ============================================================================

/// Source of catalog MET values for free-text exercise names
#[async_trait]
pub trait ExerciseCatalog: Send + Sync {
    async fn find_met(&self, exercise_name: &str) -> MetLookup;
}

/// Catalog backed by the `exercises` table
pub struct PgExerciseCatalog<'a> {
    db: &'a PgPool,
}

impl<'a> PgExerciseCatalog<'a> {
    pub fn new(db: &'a PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ExerciseCatalog for PgExerciseCatalog<'_> {
    async fn find_met(&self, exercise_name: &str) -> MetLookup {
        match ExerciseCatalogRepository::find_by_name(self.db, exercise_name).await {
            Ok(Some(record)) => MetLookup::Found(crate::repositories::decimal_to_f64(record.met)),
            Ok(None) => MetLookup::NotFound,
            Err(e) => {
                warn!(error = %e, exercise = exercise_name, "MET lookup failed, using fallback");
                MetLookup::Failed(e.to_string())
            }
        }
    }
}

fn lookup_outcome(lookup: &MetLookup) -> &'static str {
    match lookup {
        MetLookup::Skipped => "skipped",
        MetLookup::Found(_) => "found",
        MetLookup::NotFound => "not_found",
        MetLookup::Failed(_) => "failed",
    }
}

// ============================================================================
// Service
// ============================================================================

/// Workout service
pub struct WorkoutService;

impl WorkoutService {
    pub async fn search(db: &PgPool, query: Option<&str>) -> Result<Vec<Exercise>, ApiError> {
        let Some(query) = query.map(str::trim).filter(|q| !q.is_empty()) else {
            return Ok(Vec::new());
        };

        ExerciseCatalogRepository::search(db, query, SEARCH_LIMIT)
            .await
            .map_err(ApiError::Internal)?
            .into_iter()
            .map(|record| Exercise::try_from(record).map_err(|e| ApiError::Internal(e.into())))
            .collect()
    }

    pub async fn daily_log(db: &PgPool, user_id: Uuid, date: NaiveDate) -> Result<WorkoutLogResponse, ApiError> {
        let workouts = WorkoutRepository::get_by_date(db, user_id, date)
            .await
            .map_err(ApiError::Internal)?
            .into_iter()
            .map(|record| Workout::try_from(record).map_err(|e| ApiError::Internal(e.into())))
            .collect::<Result<Vec<_>, _>>()?;

        let total_burned = sum_burned(&workouts);
        Ok(WorkoutLogResponse {
            date,
            workouts,
            total_burned,
        })
    }

    fn validate_log_request(req: &LogWorkoutRequest) -> Result<(), ApiError> {
        req.validate()?;

        match req.duration {
            Some(minutes) => validate_duration_minutes(minutes)
                .map_err(|msg| ApiError::Validation(labelled("duration", &msg)))?,
            None if req.exercise_type == ExerciseType::Cardio => {
                return Err(ApiError::Validation(
                    "Duration is required for cardio workouts".to_string(),
                ));
            }
            None => {}
        }

        if let Some(met) = req.met {
            validate_met(met).map_err(|msg| ApiError::Validation(labelled("met", &msg)))?;
        }
        if req.exercise_name.trim().is_empty() {
            return Err(ApiError::Validation(labelled("exercise_name", "Name is required")));
        }
        Ok(())
    }

    pub fn burn_params(req: &LogWorkoutRequest, user_weight_kg: Option<f64>) -> BurnParams {
        BurnParams {
            exercise_type: Some(req.exercise_type),
            met: req.met,
            duration_minutes: req.duration.map(f64::from),
            sets: req.sets,
            weight: req.weight,
            sets_data: req.sets_data.clone().unwrap_or_default(),
            user_weight_kg,
        }
    }

    /// Estimate the burn, consulting the catalog only when no explicit MET is given
    pub async fn estimate(
        req: &LogWorkoutRequest,
        user_weight_kg: Option<f64>,
        catalog: &dyn ExerciseCatalog,
    ) -> BurnEstimate {
        let params = Self::burn_params(req, user_weight_kg);
        let has_explicit_met = params.met.is_some_and(|m| m > 0.0);
        let name = req.exercise_name.trim();

        let lookup = if has_explicit_met || name.is_empty() {
            MetLookup::Skipped
        } else {
            catalog.find_met(name).await
        };
        telemetry::record_met_lookup(lookup_outcome(&lookup));

        let estimate = estimate_calories_burned(&params, lookup);
        debug!(
            met = estimate.met,
            minutes = estimate.duration_minutes,
            calories = estimate.calories_burned,
            source = ?estimate.met_source,
            "Estimated workout burn"
        );
        estimate
    }

    pub async fn log_workout(db: &PgPool, auth: &AuthUser, req: LogWorkoutRequest) -> Result<Workout, ApiError> {
        Self::validate_log_request(&req)?;
        let user = ProfileService::get_or_provision(db, auth).await?;

        let estimate = Self::estimate(&req, user.weight, &PgExerciseCatalog::new(db)).await;

        let sets_data = req.sets_data.filter(|sets| !sets.is_empty());
        let weight = if sets_data.is_some() || req.weight.is_some() {
            Some(f64_to_decimal(estimate.avg_weight))
        } else {
            None
        };
        let sets = req
            .sets
            .or_else(|| sets_data.as_ref().and_then(|s| i32::try_from(s.len()).ok()));
        let calories_burned = i32::try_from(estimate.calories_burned)
            .map_err(|_| ApiError::Validation("Workout is too large to record".to_string()))?;

        let record = WorkoutRepository::create(
            db,
            CreateWorkout {
                user_id: auth.user_id,
                date: req.date,
                exercise_type: req.exercise_type.as_str().to_string(),
                exercise_name: req.exercise_name.trim().to_string(),
                duration: req.duration,
                sets,
                reps: req.reps,
                weight,
                muscle_group: req.muscle_group.map(|g| g.as_str().to_string()),
                sets_data,
                calories_burned,
            },
        )
        .await
        .map_err(ApiError::Internal)?;

        telemetry::record_entry_logged("workout");
        Workout::try_from(record).map_err(|e| ApiError::Internal(e.into()))
    }

    pub async fn delete_workout(db: &PgPool, user_id: Uuid, workout_id: Uuid) -> Result<(), ApiError> {
        let deleted = WorkoutRepository::delete(db, user_id, workout_id)
            .await
            .map_err(ApiError::Internal)?;

        if !deleted {
            return Err(ApiError::NotFound("Workout not found".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gym_freak_shared::{MetSource, SetEntry};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubCatalog {
        lookup: MetLookup,
        calls: AtomicUsize,
    }

    impl StubCatalog {
        fn new(lookup: MetLookup) -> Self {
            Self {
                lookup,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ExerciseCatalog for StubCatalog {
        async fn find_met(&self, _exercise_name: &str) -> MetLookup {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.lookup.clone()
        }
    }

    fn squat_request() -> LogWorkoutRequest {
        LogWorkoutRequest {
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            exercise_type: ExerciseType::Strength,
            exercise_name: "Squat".to_string(),
            duration: None,
            sets: Some(2),
            reps: None,
            weight: None,
            muscle_group: None,
            sets_data: Some(vec![SetEntry::new(100.0, 5), SetEntry::new(100.0, 5)]),
            met: None,
        }
    }

    #[tokio::test]
    async fn test_estimate_uses_catalog_met() {
        let catalog = StubCatalog::new(MetLookup::Found(5.0));
        let estimate = WorkoutService::estimate(&squat_request(), Some(70.0), &catalog).await;

        // 5.0 * 1.5 intensity * 70kg * 4/60h
        assert_eq!(estimate.calories_burned, 35);
        assert_eq!(estimate.met_source, MetSource::Catalog);
        assert_eq!(catalog.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_estimate_reference_case_with_failed_lookup() {
        let catalog = StubCatalog::new(MetLookup::Failed("connection refused".to_string()));
        let estimate = WorkoutService::estimate(&squat_request(), Some(80.0), &catalog).await;

        assert_eq!(estimate.calories_burned, 28);
        assert_eq!(estimate.avg_weight, 100.0);
        assert_eq!(estimate.met_source, MetSource::Fallback);
    }

    #[tokio::test]
    async fn test_explicit_met_skips_catalog() {
        let catalog = StubCatalog::new(MetLookup::Found(12.0));
        let req = LogWorkoutRequest {
            met: Some(4.0),
            ..squat_request()
        };
        let estimate = WorkoutService::estimate(&req, Some(70.0), &catalog).await;

        assert_eq!(estimate.met_source, MetSource::Explicit);
        assert_eq!(catalog.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_user_weight_defaults() {
        let catalog = StubCatalog::new(MetLookup::NotFound);
        let req = LogWorkoutRequest {
            exercise_type: ExerciseType::Cardio,
            exercise_name: "Rowing".to_string(),
            duration: Some(60),
            sets: None,
            sets_data: None,
            ..squat_request()
        };
        let estimate = WorkoutService::estimate(&req, None, &catalog).await;

        // 7.0 fallback * 70kg default * 1h
        assert_eq!(estimate.calories_burned, 490);
    }

    #[test]
    fn test_cardio_requires_duration() {
        let req = LogWorkoutRequest {
            exercise_type: ExerciseType::Cardio,
            ..squat_request()
        };
        match WorkoutService::validate_log_request(&req) {
            Err(ApiError::Validation(msg)) => assert!(msg.contains("Duration")),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_strength_without_duration_is_valid() {
        assert!(WorkoutService::validate_log_request(&squat_request()).is_ok());
    }

    #[test]
    fn test_out_of_range_met_rejected() {
        let req = LogWorkoutRequest {
            met: Some(45.0),
            ..squat_request()
        };
        assert!(matches!(
            WorkoutService::validate_log_request(&req),
            Err(ApiError::Validation(_))
        ));
    }
}
