//! Data models
//!
//! Rust structs representing database entities.

mod daily_goal;
mod exercise;
mod exercise_log;
mod food_item;
mod food_log;
mod profile;

pub use daily_goal::DailyGoal;
pub use exercise::{Exercise, ExerciseCreate};
pub use exercise_log::{ExerciseLog, ExerciseLogCreate, ExerciseLogDetail};
pub use food_item::{FoodItem, FoodItemCreate};
pub use food_log::{DailyConsumption, FoodLog, FoodLogCreate, FoodLogDetail, MealType};
pub use profile::{Gender, Profile, ProfileUpsert};
