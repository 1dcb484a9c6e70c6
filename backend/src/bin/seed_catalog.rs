//! Catalog seeder
//!
//! Loads food and exercise rows from JSON files into the shared catalog.
//! Rows that already exist (case-insensitive name match) are left alone
//! unless `--force` is given, in which case they are overwritten.
//!
//! Usage:
//! ```bash
//! # Seed both catalogs
//! cargo run --bin seed-catalog -- --foods data/foods.json --exercises data/exercises.json
//!
//! # Overwrite existing rows
//! cargo run --bin seed-catalog -- --foods data/foods.json --force
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use gym_freak_backend::config::AppConfig;
use gym_freak_backend::db;
use gym_freak_backend::repositories::{
    f64_to_decimal, ExerciseCatalogRepository, FoodCatalogRepository, NewExercise, NewFoodItem,
};
use gym_freak_shared::models::ExerciseType;
use gym_freak_shared::validation::{validate_met, validate_nutrient, validate_serving_size};
use serde::Deserialize;
use sqlx::PgPool;
use tracing::{debug, info, warn};

const BATCH_SIZE: usize = 50;

#[derive(Parser)]
#[command(
    name = "seed-catalog",
    about = "Seed the food and exercise catalogs",
    long_about = "Reads JSON arrays of foods and exercises and inserts them into the shared catalog. Existing names are skipped unless --force is set."
)]
struct SeedArgs {
    /// Database URL (falls back to GF__DATABASE__URL / config files)
    #[arg(long)]
    database_url: Option<String>,

    /// JSON file with food rows
    #[arg(long)]
    foods: Option<PathBuf>,

    /// JSON file with exercise rows
    #[arg(long)]
    exercises: Option<PathBuf>,

    /// Overwrite rows whose name already exists
    #[arg(long)]
    force: bool,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[derive(Debug, Deserialize)]
struct FoodRow {
    name: String,
    calories: f64,
    protein: f64,
    carbs: f64,
    fat: f64,
    serving_size: f64,
    #[serde(default = "default_unit")]
    unit: String,
}

fn default_unit() -> String {
    "g".to_string()
}

#[derive(Debug, Deserialize)]
struct ExerciseRow {
    name: String,
    met: f64,
    #[serde(rename = "type")]
    exercise_type: ExerciseType,
    #[serde(default)]
    muscle_group: Option<String>,
}

impl FoodRow {
    fn check(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name is empty".to_string());
        }
        validate_serving_size(self.serving_size)?;
        for value in [self.calories, self.protein, self.carbs, self.fat] {
            validate_nutrient(value)?;
        }
        Ok(())
    }

    fn into_new(self) -> NewFoodItem {
        NewFoodItem {
            name: self.name.trim().to_string(),
            calories: f64_to_decimal(self.calories),
            protein: f64_to_decimal(self.protein),
            carbs: f64_to_decimal(self.carbs),
            fat: f64_to_decimal(self.fat),
            serving_size: f64_to_decimal(self.serving_size),
            unit: self.unit,
        }
    }
}

impl ExerciseRow {
    fn check(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name is empty".to_string());
        }
        validate_met(self.met)
    }

    fn into_new(self) -> NewExercise {
        NewExercise {
            name: self.name.trim().to_string(),
            met: f64_to_decimal(self.met),
            exercise_type: self.exercise_type,
            muscle_group: self.muscle_group,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = SeedArgs::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(log_level).init();

    info!("=== Gym Freak Catalog Seeder ===");

    if args.foods.is_none() && args.exercises.is_none() {
        bail!("Nothing to seed: pass --foods and/or --exercises");
    }

    let database_url = match args.database_url {
        Some(url) => url,
        None => AppConfig::load()?.database.url,
    };

    let pool = db::create_pool(&database_url, 2).await?;
    db::run_migrations(&pool).await?;

    if let Some(path) = &args.foods {
        let rows = load_rows::<FoodRow>(path)?;
        let items: Vec<NewFoodItem> = rows
            .into_iter()
            .filter(|row| keep_row(&row.name, row.check()))
            .map(FoodRow::into_new)
            .collect();
        info!("Seeding {} foods from {}", items.len(), path.display());
        let written = seed_foods(&pool, &items, args.force).await?;
        info!("  {} food rows written", written);
    }

    if let Some(path) = &args.exercises {
        let rows = load_rows::<ExerciseRow>(path)?;
        let items: Vec<NewExercise> = rows
            .into_iter()
            .filter(|row| keep_row(&row.name, row.check()))
            .map(ExerciseRow::into_new)
            .collect();
        info!("Seeding {} exercises from {}", items.len(), path.display());
        let written = seed_exercises(&pool, &items, args.force).await?;
        info!("  {} exercise rows written", written);
    }

    info!("=== Seeding Complete ===");
    Ok(())
}

fn load_rows<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Vec<T>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid JSON in {}", path.display()))
}

fn keep_row(name: &str, check: Result<(), String>) -> bool {
    match check {
        Ok(()) => true,
        Err(reason) => {
            warn!("  skipping '{}': {}", name, reason);
            false
        }
    }
}

async fn seed_foods(pool: &PgPool, items: &[NewFoodItem], force: bool) -> Result<u64> {
    let mut written = 0;
    for batch in items.chunks(BATCH_SIZE) {
        if force {
            for item in batch {
                let existed = FoodCatalogRepository::find_by_name(pool, &item.name).await?.is_some();
                FoodCatalogRepository::upsert_by_name(pool, item).await?;
                debug!("  ✓ {} ({})", item.name, if existed { "updated" } else { "added" });
                written += 1;
            }
        } else {
            written += FoodCatalogRepository::insert_missing(pool, batch).await?;
        }
    }
    Ok(written)
}

async fn seed_exercises(pool: &PgPool, items: &[NewExercise], force: bool) -> Result<u64> {
    let mut written = 0;
    for batch in items.chunks(BATCH_SIZE) {
        if force {
            for item in batch {
                ExerciseCatalogRepository::upsert_by_name(pool, item).await?;
                debug!("  ✓ {}", item.name);
                written += 1;
            }
        } else {
            written += ExerciseCatalogRepository::insert_missing(pool, batch).await?;
        }
    }
    Ok(written)
}
