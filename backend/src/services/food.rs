//! Food service - catalog search and the daily food log

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::repositories::{
    f64_to_decimal, CreateFoodEntry, FoodCatalogRepository, FoodEntryRepository, NewFoodItem,
    SEARCH_LIMIT,
};
use crate::services::ProfileService;
use crate::telemetry;
use chrono::NaiveDate;
use gym_freak_shared::types::{FoodData, FoodLogResponse, LogFoodRequest};
use gym_freak_shared::validation::{labelled, validate_nutrient, validate_quantity, validate_serving_size};
use gym_freak_shared::{aggregate_food_log, FoodEntry, FoodItem};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Food service
pub struct FoodService;

impl FoodService {
    /// Catalog search; a blank query returns nothing
    pub async fn search(db: &PgPool, query: Option<&str>) -> Result<Vec<FoodItem>, ApiError> {
        let Some(query) = query.map(str::trim).filter(|q| !q.is_empty()) else {
            return Ok(Vec::new());
        };

        let items = FoodCatalogRepository::search(db, query, SEARCH_LIMIT)
            .await
            .map_err(ApiError::Internal)?;

        Ok(items.into_iter().map(FoodItem::from).collect())
    }

    /// Entries for one day with scaled nutrients and totals
    pub async fn daily_log(db: &PgPool, user_id: Uuid, date: NaiveDate) -> Result<FoodLogResponse, ApiError> {
        let entries: Vec<FoodEntry> = FoodEntryRepository::get_by_date(db, user_id, date)
            .await
            .map_err(ApiError::Internal)?
            .into_iter()
            .map(FoodEntry::from)
            .collect();

        let summary = aggregate_food_log(&entries);
        Ok(FoodLogResponse {
            date,
            entries: summary.entries,
            totals: summary.totals,
        })
    }

    fn validate_food_data(data: &FoodData) -> Result<(), ApiError> {
        validate_serving_size(data.serving_size)
            .map_err(|msg| ApiError::Validation(labelled("serving_size", &msg)))?;
        for value in [data.calories, data.protein, data.carbs, data.fat] {
            validate_nutrient(value).map_err(ApiError::Validation)?;
        }
        Ok(())
    }

    fn validate_log_request(req: &LogFoodRequest) -> Result<(), ApiError> {
        req.validate()?;
        validate_quantity(req.quantity).map_err(|msg| ApiError::Validation(labelled("quantity", &msg)))?;
        if let Some(data) = &req.food_data {
            Self::validate_food_data(data)?;
        }
        if req.food_id.is_none() && req.food_data.is_none() {
            return Err(ApiError::Validation("Food ID is required".to_string()));
        }
        Ok(())
    }

    /// Catalog id for the entry: the given id, else the inline item upserted by name
    async fn resolve_food_id(db: &PgPool, req: &LogFoodRequest) -> Result<Uuid, ApiError> {
        if let Some(food_id) = req.food_id {
            return FoodCatalogRepository::find_by_id(db, food_id)
                .await
                .map_err(ApiError::Internal)?
                .map(|item| item.id)
                .ok_or_else(|| ApiError::NotFound("Food not found".to_string()));
        }

        let data = req
            .food_data
            .as_ref()
            .ok_or_else(|| ApiError::Validation("Food ID is required".to_string()))?;

        let item = FoodCatalogRepository::upsert_by_name(
            db,
            &NewFoodItem {
                name: data.name.clone(),
                calories: f64_to_decimal(data.calories),
                protein: f64_to_decimal(data.protein),
                carbs: f64_to_decimal(data.carbs),
                fat: f64_to_decimal(data.fat),
                serving_size: f64_to_decimal(data.serving_size),
                unit: data.unit.clone(),
            },
        )
        .await
        .map_err(ApiError::Internal)?;

        Ok(item.id)
    }

    pub async fn log_food(db: &PgPool, auth: &AuthUser, req: LogFoodRequest) -> Result<FoodEntry, ApiError> {
        Self::validate_log_request(&req)?;
        ProfileService::get_or_provision(db, auth).await?;

        let food_id = Self::resolve_food_id(db, &req).await?;

        let entry = FoodEntryRepository::create(
            db,
            CreateFoodEntry {
                user_id: auth.user_id,
                food_id,
                date: req.date,
                quantity: f64_to_decimal(req.quantity),
                meal_type: req.meal_type.as_str().to_string(),
            },
        )
        .await
        .map_err(ApiError::Internal)?;

        telemetry::record_entry_logged("food");
        Ok(entry.into())
    }

    pub async fn delete_entry(db: &PgPool, user_id: Uuid, entry_id: Uuid) -> Result<(), ApiError> {
        let deleted = FoodEntryRepository::delete(db, user_id, entry_id)
            .await
            .map_err(ApiError::Internal)?;

        if !deleted {
            return Err(ApiError::NotFound("Entry not found".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gym_freak_shared::MealType;

    fn request() -> LogFoodRequest {
        LogFoodRequest {
            food_id: Some(Uuid::new_v4()),
            food_data: None,
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            quantity: 150.0,
            meal_type: MealType::Lunch,
        }
    }

    fn food_data(serving_size: f64) -> FoodData {
        FoodData {
            name: "Lentil Soup".to_string(),
            calories: 120.0,
            protein: 9.0,
            carbs: 20.0,
            fat: 0.5,
            serving_size,
            unit: "g".to_string(),
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(FoodService::validate_log_request(&request()).is_ok());
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let req = LogFoodRequest {
            quantity: 0.0,
            ..request()
        };
        match FoodService::validate_log_request(&req) {
            Err(ApiError::Validation(msg)) => assert!(msg.starts_with("Quantity")),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_missing_food_reference_rejected() {
        let req = LogFoodRequest {
            food_id: None,
            ..request()
        };
        match FoodService::validate_log_request(&req) {
            Err(ApiError::Validation(msg)) => assert_eq!(msg, "Food ID is required"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_inline_food_needs_positive_serving() {
        let req = LogFoodRequest {
            food_id: None,
            food_data: Some(food_data(0.0)),
            ..request()
        };
        assert!(matches!(
            FoodService::validate_log_request(&req),
            Err(ApiError::Validation(_))
        ));

        let req = LogFoodRequest {
            food_id: None,
            food_data: Some(food_data(250.0)),
            ..request()
        };
        assert!(FoodService::validate_log_request(&req).is_ok());
    }
}
