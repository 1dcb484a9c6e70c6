//! Exercise catalog repository

use anyhow::Result;
use gym_freak_shared::{DomainError, Exercise, ExerciseType};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use super::{decimal_to_f64, like_pattern};

/// Exercise catalog row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ExerciseRecord {
    pub id: Uuid,
    pub name: String,
    pub met: Decimal,
    pub exercise_type: String,
    pub muscle_group: Option<String>,
}

impl TryFrom<ExerciseRecord> for Exercise {
    type Error = DomainError;

    fn try_from(r: ExerciseRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: r.id,
            name: r.name,
            met: decimal_to_f64(r.met),
            exercise_type: r.exercise_type.parse()?,
            // Free-text groups from older rows are dropped rather than failing the read
            muscle_group: r.muscle_group.and_then(|g| g.parse().ok()),
        })
    }
}

/// Input for adding (or refreshing) a catalog exercise
#[derive(Debug, Clone)]
pub struct NewExercise {
    pub name: String,
    pub met: Decimal,
    pub exercise_type: ExerciseType,
    pub muscle_group: Option<String>,
}

pub struct ExerciseCatalogRepository;

impl ExerciseCatalogRepository {
    pub async fn search(db: &PgPool, query: &str, limit: i64) -> Result<Vec<ExerciseRecord>> {
        let items = sqlx::query_as::<_, ExerciseRecord>(
            r#"
            SELECT id, name, met, type AS exercise_type, muscle_group
            FROM exercises
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

    /// Best catalog match for a free-text exercise name: an exact
    /// (case-insensitive) match wins, then the shortest partial match
    pub async fn find_by_name(db: &PgPool, name: &str) -> Result<Option<ExerciseRecord>> {
        let item = sqlx::query_as::<_, ExerciseRecord>(
            r#"
            SELECT id, name, met, type AS exercise_type, muscle_group
            FROM exercises
            WHERE name ILIKE $1
            ORDER BY (LOWER(name) = LOWER($2)) DESC, LENGTH(name), name
            LIMIT 1
            "#,
        )
        .bind(like_pattern(name))
        .bind(name.trim())
        .fetch_optional(db)
        .await?;

        Ok(item)
    }

    pub async fn upsert_by_name(db: &PgPool, input: &NewExercise) -> Result<ExerciseRecord> {
        let item = sqlx::query_as::<_, ExerciseRecord>(
            r#"
            INSERT INTO exercises (name, met, type, muscle_group)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT ((LOWER(name))) DO UPDATE SET
                met = EXCLUDED.met,
                type = EXCLUDED.type,
                muscle_group = EXCLUDED.muscle_group
            RETURNING id, name, met, type AS exercise_type, muscle_group
            "#,
        )
        .bind(input.name.trim())
        .bind(input.met)
        .bind(input.exercise_type.as_str())
        .bind(&input.muscle_group)
        .fetch_one(db)
        .await?;

        Ok(item)
    }

    /// Insert only names not yet in the catalog; returns rows inserted
    pub async fn insert_missing(db: &PgPool, items: &[NewExercise]) -> Result<u64> {
        let mut tx = db.begin().await?;
        let mut inserted = 0;

        for input in items {
            let result = sqlx::query(
                r#"
                INSERT INTO exercises (name, met, type, muscle_group)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(input.name.trim())
            .bind(input.met)
            .bind(input.exercise_type.as_str())
            .bind(&input.muscle_group)
            .execute(&mut *tx)
            .await?;
            inserted += result.rows_affected();
        }

        tx.commit().await?;
        Ok(inserted)
    }
}
