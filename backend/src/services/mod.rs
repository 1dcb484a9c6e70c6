//! Business logic services
//!
//! Services validate input, call repositories and run the shared
//! calculations on the rows they return.

pub mod ai;
pub mod food;
pub mod history;
pub mod profile;
pub mod water;
pub mod workout;

pub use ai::AiService;
pub use food::FoodService;
pub use history::HistoryService;
pub use profile::ProfileService;
pub use water::WaterService;
pub use workout::{ExerciseCatalog, PgExerciseCatalog, WorkoutService};
