//! Log aggregation
//!
//! Scales catalog nutrients by serving ratio and folds food, workout and
//! water entries into per-day totals. Inputs are never mutated.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{FoodEntry, FoodItem, WaterEntry, Workout};

// ============================================================================
// Food Log
// ============================================================================

/// Calories (kcal) and macros (g)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Nutrients {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl Nutrients {
    fn add(&mut self, other: &Nutrients) {
        self.calories += other.calories;
        self.protein += other.protein;
        self.carbs += other.carbs;
        self.fat += other.fat;
    }
}

/// Food entry with its nutrients scaled to the logged quantity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedFoodEntry {
    #[serde(flatten)]
    pub entry: FoodEntry,
    pub calculated: Nutrients,
    /// Set when the catalog serving size made scaling impossible
    pub skipped: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FoodLogSummary {
    pub entries: Vec<EnrichedFoodEntry>,
    pub totals: Nutrients,
}

/// Scale a catalog item to a quantity. `None` when the ratio is not finite.
pub fn scale_nutrients(food: &FoodItem, quantity: f64) -> Option<Nutrients> {
    if food.serving_size <= 0.0 {
        return None;
    }
    let ratio = quantity / food.serving_size;
    if !ratio.is_finite() {
        return None;
    }
    let scaled = Nutrients {
        calories: food.calories * ratio,
        protein: food.protein * ratio,
        carbs: food.carbs * ratio,
        fat: food.fat * ratio,
    };
    let finite = [scaled.calories, scaled.protein, scaled.carbs, scaled.fat]
        .iter()
        .all(|v| v.is_finite());
    finite.then_some(scaled)
}

fn enrich(entry: &FoodEntry) -> EnrichedFoodEntry {
    let scaled = scale_nutrients(&entry.food, entry.quantity);
    EnrichedFoodEntry {
        entry: entry.clone(),
        calculated: scaled.unwrap_or_default(),
        skipped: scaled.is_none(),
    }
}

/// Per-entry scaled nutrients plus totals for a food log
pub fn aggregate_food_log(entries: &[FoodEntry]) -> FoodLogSummary {
    let entries: Vec<EnrichedFoodEntry> = entries.iter().map(enrich).collect();
    let mut totals = Nutrients::default();
    for entry in &entries {
        totals.add(&entry.calculated);
    }
    FoodLogSummary { entries, totals }
}

/// Total stored calories burned
pub fn sum_burned(workouts: &[Workout]) -> i64 {
    workouts.iter().map(|w| w.calories_burned).sum()
}

/// Total water (ml)
pub fn sum_water(entries: &[WaterEntry]) -> i64 {
    entries.iter().map(|e| i64::from(e.amount)).sum()
}

/// Calories left for the day: target minus net intake (consumed minus burned)
pub fn remaining_calories(target: i64, consumed: f64, burned: i64) -> i64 {
    target - (consumed - burned as f64).round() as i64
}

// ============================================================================
// History
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DayTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub burned: i64,
    /// ml
    pub water: i64,
}

/// Everything logged on one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayAggregate {
    pub date: NaiveDate,
    pub foods: Vec<EnrichedFoodEntry>,
    pub workouts: Vec<Workout>,
    pub water: Vec<WaterEntry>,
    pub totals: DayTotals,
}

impl DayAggregate {
    fn new(date: NaiveDate) -> Self {
        Self {
            date,
            foods: Vec::new(),
            workouts: Vec::new(),
            water: Vec::new(),
            totals: DayTotals::default(),
        }
    }

    /// Net calories (consumed minus burned)
    pub fn net_calories(&self) -> f64 {
        self.totals.calories - self.totals.burned as f64
    }
}

/// Day aggregates keyed by date, in first-occurrence order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DayHistory {
    days: Vec<DayAggregate>,
    index: HashMap<NaiveDate, usize>,
}

impl DayHistory {
    fn day_mut(&mut self, date: NaiveDate) -> &mut DayAggregate {
        let next = self.days.len();
        let idx = *self.index.entry(date).or_insert(next);
        if idx == next {
            self.days.push(DayAggregate::new(date));
        }
        &mut self.days[idx]
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DayAggregate> {
        self.index.get(&date).map(|&idx| &self.days[idx])
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Days in first-occurrence order
    pub fn iter(&self) -> impl Iterator<Item = &DayAggregate> {
        self.days.iter()
    }

    /// Newest day first
    pub fn into_descending(self) -> Vec<DayAggregate> {
        let mut days = self.days;
        days.sort_by(|a, b| b.date.cmp(&a.date));
        days
    }

    /// Oldest day first
    pub fn into_chronological(self) -> Vec<DayAggregate> {
        let mut days = self.days;
        days.sort_by_key(|day| day.date);
        days
    }
}

/// Group food, workout and water entries by date within `[start, end]`.
///
/// One aggregate per distinct date in the food or workout logs. Water is
/// folded into those days only and never creates a day of its own.
/// Out-of-range entries are ignored.
pub fn aggregate_history(
    foods: &[FoodEntry],
    workouts: &[Workout],
    water: &[WaterEntry],
    start: NaiveDate,
    end: NaiveDate,
) -> DayHistory {
    let in_range = |date: NaiveDate| date >= start && date <= end;
    let mut history = DayHistory::default();

    for entry in foods.iter().filter(|e| in_range(e.date)) {
        let enriched = enrich(entry);
        let day = history.day_mut(entry.date);
        day.totals.calories += enriched.calculated.calories;
        day.totals.protein += enriched.calculated.protein;
        day.totals.carbs += enriched.calculated.carbs;
        day.totals.fat += enriched.calculated.fat;
        day.foods.push(enriched);
    }

    for workout in workouts.iter().filter(|w| in_range(w.date)) {
        let day = history.day_mut(workout.date);
        day.totals.burned += workout.calories_burned;
        day.workouts.push(workout.clone());
    }

    for entry in water.iter().filter(|e| in_range(e.date)) {
        if let Some(&idx) = history.index.get(&entry.date) {
            let day = &mut history.days[idx];
            day.totals.water += i64::from(entry.amount);
            day.water.push(entry.clone());
        }
    }

    history
}
