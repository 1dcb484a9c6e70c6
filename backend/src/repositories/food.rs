//! Food catalog and food log repositories

use anyhow::Result;
use chrono::NaiveDate;
use gym_freak_shared::{FoodEntry, FoodItem};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use super::{decimal_to_f64, like_pattern};

// ============================================================================
// Catalog
// ============================================================================

/// Food catalog row; nutrients are per `serving_size`
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FoodRecord {
    pub id: Uuid,
    pub name: String,
    pub calories: Decimal,
    pub protein: Decimal,
    pub carbs: Decimal,
    pub fat: Decimal,
    pub serving_size: Decimal,
    pub unit: String,
}

impl From<FoodRecord> for FoodItem {
    fn from(r: FoodRecord) -> Self {
        Self {
            id: r.id,
            name: r.name,
            calories: decimal_to_f64(r.calories),
            protein: decimal_to_f64(r.protein),
            carbs: decimal_to_f64(r.carbs),
            fat: decimal_to_f64(r.fat),
            serving_size: decimal_to_f64(r.serving_size),
            unit: r.unit,
        }
    }
}

/// Input for adding (or refreshing) a catalog item
#[derive(Debug, Clone)]
pub struct NewFoodItem {
    pub name: String,
    pub calories: Decimal,
    pub protein: Decimal,
    pub carbs: Decimal,
    pub fat: Decimal,
    pub serving_size: Decimal,
    pub unit: String,
}

pub struct FoodCatalogRepository;

impl FoodCatalogRepository {
    /// Case-insensitive substring search, shortest names first
    pub async fn search(db: &PgPool, query: &str, limit: i64) -> Result<Vec<FoodRecord>> {
        let items = sqlx::query_as::<_, FoodRecord>(
            r#"
            SELECT id, name, calories, protein, carbs, fat, serving_size, unit
            FROM foods
            WHERE name ILIKE $1
            ORDER BY LENGTH(name), name
            LIMIT $2
            "#,
        )
        .bind(like_pattern(query))
        .bind(limit)
        .fetch_all(db)
        .await?;

        Ok(items)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<FoodRecord>> {
        let item = sqlx::query_as::<_, FoodRecord>(
            r#"
            SELECT id, name, calories, protein, carbs, fat, serving_size, unit
            FROM foods
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;

        Ok(item)
    }

    pub async fn find_by_name(db: &PgPool, name: &str) -> Result<Option<FoodRecord>> {
        let item = sqlx::query_as::<_, FoodRecord>(
            r#"
            SELECT id, name, calories, protein, carbs, fat, serving_size, unit
            FROM foods
            WHERE LOWER(name) = LOWER($1)
            "#,
        )
        .bind(name.trim())
        .fetch_optional(db)
        .await?;

        Ok(item)
    }

    /// Insert by name, overwriting the nutrient values of an existing item
    /// with the same name (case-insensitive)
    pub async fn upsert_by_name(db: &PgPool, input: &NewFoodItem) -> Result<FoodRecord> {
        let item = sqlx::query_as::<_, FoodRecord>(
            r#"
            INSERT INTO foods (name, calories, protein, carbs, fat, serving_size, unit)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT ((LOWER(name))) DO UPDATE SET
                calories = EXCLUDED.calories,
                protein = EXCLUDED.protein,
                carbs = EXCLUDED.carbs,
                fat = EXCLUDED.fat,
                serving_size = EXCLUDED.serving_size,
                unit = EXCLUDED.unit
            RETURNING id, name, calories, protein, carbs, fat, serving_size, unit
            "#,
        )
        .bind(input.name.trim())
        .bind(input.calories)
        .bind(input.protein)
        .bind(input.carbs)
        .bind(input.fat)
        .bind(input.serving_size)
        .bind(&input.unit)
        .fetch_one(db)
        .await?;

        Ok(item)
    }

    /// Insert only names not yet in the catalog; returns rows inserted
    pub async fn insert_missing(db: &PgPool, items: &[NewFoodItem]) -> Result<u64> {
        let mut tx = db.begin().await?;
        let mut inserted = 0;

        for input in items {
            let result = sqlx::query(
                r#"
                INSERT INTO foods (name, calories, protein, carbs, fat, serving_size, unit)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(input.name.trim())
            .bind(input.calories)
            .bind(input.protein)
            .bind(input.carbs)
            .bind(input.fat)
            .bind(input.serving_size)
            .bind(&input.unit)
            .execute(&mut *tx)
            .await?;
            inserted += result.rows_affected();
        }

        tx.commit().await?;
        Ok(inserted)
    }
}

// ============================================================================
// Food Log
// ============================================================================

/// Food log row joined with its catalog item
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FoodEntryRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub quantity: Decimal,
    pub meal_type: String,
    pub food_id: Uuid,
    pub food_name: String,
    pub calories: Decimal,
    pub protein: Decimal,
    pub carbs: Decimal,
    pub fat: Decimal,
    pub serving_size: Decimal,
    pub unit: String,
}

impl From<FoodEntryRecord> for FoodEntry {
    fn from(r: FoodEntryRecord) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            date: r.date,
            quantity: decimal_to_f64(r.quantity),
            meal_type: r.meal_type.parse().unwrap_or_default(),
            food: FoodItem {
                id: r.food_id,
                name: r.food_name,
                calories: decimal_to_f64(r.calories),
                protein: decimal_to_f64(r.protein),
                carbs: decimal_to_f64(r.carbs),
                fat: decimal_to_f64(r.fat),
                serving_size: decimal_to_f64(r.serving_size),
                unit: r.unit,
            },
        }
    }
}

/// Input for logging food
#[derive(Debug, Clone)]
pub struct CreateFoodEntry {
    pub user_id: Uuid,
    pub food_id: Uuid,
    pub date: NaiveDate,
    pub quantity: Decimal,
    pub meal_type: String,
}

const ENTRY_SELECT: &str = r#"
    SELECT e.id, e.user_id, e.date, e.quantity, e.meal_type,
           f.id AS food_id, f.name AS food_name, f.calories, f.protein,
           f.carbs, f.fat, f.serving_size, f.unit
"#;

pub struct FoodEntryRepository;

impl FoodEntryRepository {
    pub async fn create(db: &PgPool, input: CreateFoodEntry) -> Result<FoodEntryRecord> {
        let entry = sqlx::query_as::<_, FoodEntryRecord>(&format!(
            r#"
            WITH e AS (
                INSERT INTO food_entries (user_id, food_id, date, quantity, meal_type)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id, user_id, food_id, date, quantity, meal_type
            )
            {ENTRY_SELECT}
            FROM e
            JOIN foods f ON f.id = e.food_id
            "#
        ))
        .bind(input.user_id)
        .bind(input.food_id)
        .bind(input.date)
        .bind(input.quantity)
        .bind(&input.meal_type)
        .fetch_one(db)
        .await?;

        Ok(entry)
    }

    pub async fn get_by_date(db: &PgPool, user_id: Uuid, date: NaiveDate) -> Result<Vec<FoodEntryRecord>> {
        let entries = sqlx::query_as::<_, FoodEntryRecord>(&format!(
            r#"
            {ENTRY_SELECT}
            FROM food_entries e
            JOIN foods f ON f.id = e.food_id
            WHERE e.user_id = $1 AND e.date = $2
            ORDER BY e.created_at ASC
            "#
        ))
        .bind(user_id)
        .bind(date)
        .fetch_all(db)
        .await?;

        Ok(entries)
    }

    /// Entries in `[start, end]`, newest date first
    pub async fn get_by_date_range(
        db: &PgPool,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<FoodEntryRecord>> {
        let entries = sqlx::query_as::<_, FoodEntryRecord>(&format!(
            r#"
            {ENTRY_SELECT}
            FROM food_entries e
            JOIN foods f ON f.id = e.food_id
            WHERE e.user_id = $1 AND e.date >= $2 AND e.date <= $3
            ORDER BY e.date DESC, e.created_at ASC
            "#
        ))
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(db)
        .await?;

        Ok(entries)
    }

    /// Delete an entry owned by `user_id`; false when nothing matched
    pub async fn delete(db: &PgPool, user_id: Uuid, entry_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM food_entries WHERE id = $1 AND user_id = $2")
            .bind(entry_id)
            .bind(user_id)
            .execute(db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gym_freak_shared::MealType;

    fn record(meal_type: &str) -> FoodEntryRecord {
        FoodEntryRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            quantity: Decimal::new(1505, 1),
            meal_type: meal_type.to_string(),
            food_id: Uuid::new_v4(),
            food_name: "Oats".to_string(),
            calories: Decimal::new(389, 0),
            protein: Decimal::new(169, 1),
            carbs: Decimal::new(66, 0),
            fat: Decimal::new(69, 1),
            serving_size: Decimal::new(100, 0),
            unit: "g".to_string(),
        }
    }

    #[test]
    fn test_entry_record_converts_to_model() {
        let entry = FoodEntry::from(record("breakfast"));
        assert_eq!(entry.quantity, 150.5);
        assert_eq!(entry.meal_type, MealType::Breakfast);
        assert_eq!(entry.food.protein, 16.9);
        assert_eq!(entry.food.serving_size, 100.0);
    }

    #[test]
    fn test_unknown_meal_type_reads_as_snack() {
        let entry = FoodEntry::from(record("brunch"));
        assert_eq!(entry.meal_type, MealType::Snack);
    }
}
