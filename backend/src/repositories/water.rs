//! Water intake repository

use anyhow::Result;
use chrono::NaiveDate;
use gym_freak_shared::WaterEntry;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WaterEntryRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub amount: i32,
}

impl From<WaterEntryRecord> for WaterEntry {
    fn from(r: WaterEntryRecord) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            date: r.date,
            amount: r.amount,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateWaterEntry {
    pub user_id: Uuid,
    pub date: NaiveDate,
    /// ml
    pub amount: i32,
}

pub struct WaterEntryRepository;

impl WaterEntryRepository {
    pub async fn create(db: &PgPool, input: CreateWaterEntry) -> Result<WaterEntryRecord> {
        let entry = sqlx::query_as::<_, WaterEntryRecord>(
            r#"
            INSERT INTO water_entries (user_id, date, amount)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, date, amount
            "#,
        )
        .bind(input.user_id)
        .bind(input.date)
        .bind(input.amount)
        .fetch_one(db)
        .await?;

        Ok(entry)
    }

    pub async fn get_by_date(db: &PgPool, user_id: Uuid, date: NaiveDate) -> Result<Vec<WaterEntryRecord>> {
        let entries = sqlx::query_as::<_, WaterEntryRecord>(
            r#"
            SELECT id, user_id, date, amount
            FROM water_entries
            WHERE user_id = $1 AND date = $2
            ORDER BY created_at ASC
            "#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_all(db)
        .await?;

        Ok(entries)
    }

    pub async fn get_by_date_range(
        db: &PgPool,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<WaterEntryRecord>> {
        let entries = sqlx::query_as::<_, WaterEntryRecord>(
            r#"
            SELECT id, user_id, date, amount
            FROM water_entries
            WHERE user_id = $1 AND date >= $2 AND date <= $3
            ORDER BY date DESC, created_at ASC
            "#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(db)
        .await?;

        Ok(entries)
    }

    pub async fn delete(db: &PgPool, user_id: Uuid, entry_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM water_entries WHERE id = $1 AND user_id = $2")
            .bind(entry_id)
            .bind(user_id)
            .execute(db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
