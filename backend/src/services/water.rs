//! Water service

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::repositories::{CreateWaterEntry, WaterEntryRepository};
use crate::services::ProfileService;
use crate::telemetry;
use chrono::NaiveDate;
use gym_freak_shared::types::{LogWaterRequest, WaterLogResponse};
use gym_freak_shared::validation::{labelled, validate_water_amount};
use gym_freak_shared::{sum_water, WaterEntry};
use sqlx::PgPool;
use uuid::Uuid;

pub struct WaterService;

impl WaterService {
    pub async fn daily_log(db: &PgPool, user_id: Uuid, date: NaiveDate) -> Result<WaterLogResponse, ApiError> {
        let entries: Vec<WaterEntry> = WaterEntryRepository::get_by_date(db, user_id, date)
            .await
            .map_err(ApiError::Internal)?
            .into_iter()
            .map(WaterEntry::from)
            .collect();

        let total = sum_water(&entries);
        Ok(WaterLogResponse { date, entries, total })
    }

    pub async fn log_water(db: &PgPool, auth: &AuthUser, req: LogWaterRequest) -> Result<WaterEntry, ApiError> {
        validate_water_amount(req.amount).map_err(|msg| ApiError::Validation(labelled("amount", &msg)))?;
        ProfileService::get_or_provision(db, auth).await?;

        let entry = WaterEntryRepository::create(
            db,
            CreateWaterEntry {
                user_id: auth.user_id,
                date: req.date,
                amount: req.amount,
            },
        )
        .await
        .map_err(ApiError::Internal)?;

        telemetry::record_entry_logged("water");
        Ok(entry.into())
    }

    pub async fn delete_entry(db: &PgPool, user_id: Uuid, entry_id: Uuid) -> Result<(), ApiError> {
        let deleted = WaterEntryRepository::delete(db, user_id, entry_id)
            .await
            .map_err(ApiError::Internal)?;

        if !deleted {
            return Err(ApiError::NotFound("Entry not found".to_string()));
        }
        Ok(())
    }
}
