//! Profile repository: one row per identity-provider user

use anyhow::Result;
use chrono::{DateTime, Utc};
use gym_freak_shared::User;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::decimal_to_f64;

/// Profile row from the database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub height: Option<Decimal>,
    pub weight: Option<Decimal>,
    pub activity_level: Option<String>,
    pub goal: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRecord> for User {
    fn from(r: UserRecord) -> Self {
        Self {
            id: r.id,
            email: r.email,
            name: r.name,
            age: r.age,
            gender: r.gender,
            height: r.height.map(decimal_to_f64),
            weight: r.weight.map(decimal_to_f64),
            activity_level: r.activity_level,
            goal: r.goal,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Partial profile update; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct UpdateProfile {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub height: Option<Decimal>,
    pub weight: Option<Decimal>,
    pub activity_level: Option<String>,
    pub goal: Option<String>,
}

const USER_COLUMNS: &str =
    "id, email, name, age, gender, height, weight, activity_level, goal, created_at, updated_at";

pub struct ProfileRepository;

impl ProfileRepository {
    pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;

        Ok(user)
    }

    /// Insert a bare profile from token data; a no-op when the id exists.
    /// Returns whether a row was created.
    pub async fn insert_default(db: &PgPool, id: Uuid, email: &str, name: Option<&str>) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (id, email, name)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(id)
        .bind(email)
        .bind(name)
        .execute(db)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Provision the profile if missing, then return the stored row.
    ///
    /// Concurrent first requests race on the primary key; the loser's insert
    /// is a no-op.
    pub async fn ensure_exists(
        db: &PgPool,
        id: Uuid,
        email: &str,
        name: Option<&str>,
    ) -> Result<UserRecord> {
        if let Some(user) = Self::find_by_id(db, id).await? {
            return Ok(user);
        }
        if Self::insert_default(db, id, email, name).await? {
            info!(user_id = %id, "Provisioned profile");
        }

        Self::find_by_id(db, id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Profile {} missing after insert", id))
    }

    pub async fn update(db: &PgPool, id: Uuid, input: UpdateProfile) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(&format!(
            r#"
            UPDATE users SET
                name = COALESCE($2, name),
                age = COALESCE($3, age),
                gender = COALESCE($4, gender),
                height = COALESCE($5, height),
                weight = COALESCE($6, weight),
                activity_level = COALESCE($7, activity_level),
                goal = COALESCE($8, goal),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&input.name)
        .bind(input.age)
        .bind(&input.gender)
        .bind(input.height)
        .bind(input.weight)
        .bind(&input.activity_level)
        .bind(&input.goal)
        .fetch_optional(db)
        .await?;

        Ok(user)
    }
}
