//! Daily goal calculation
//!
//! Pure, deterministic calorie and macronutrient targets from a
//! physiological profile: Mifflin-St Jeor BMR, activity-factor TDEE,
//! goal adjustment, gender calorie floor and a fixed macro split.
//!
//! Range validation (age 13-120, height 50-300 cm, weight 20-500 kg) happens
//! upstream; this module computes over whatever it is given.

use serde::{Deserialize, Serialize};

use crate::models::Gender;

/// Calorie adjustment applied for weight loss / gain goals (kcal/day)
const GOAL_CALORIE_ADJUSTMENT: f64 = 500.0;

/// Protein target in grams per kg of body weight
const PROTEIN_G_PER_KG: f64 = 1.8;

/// Share of daily calories allotted to fat
const FAT_CALORIE_SHARE: f64 = 0.30;

/// Energy density (kcal per gram)
const KCAL_PER_G_PROTEIN: f64 = 4.0;
const KCAL_PER_G_CARBS: f64 = 4.0;
const KCAL_PER_G_FAT: f64 = 9.0;

/// Weight-management goal, matching the catalog ids (1 lose, 2 maintain, 3 gain)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalKind {
    Lose,
    Maintain,
    Gain,
}

impl GoalKind {
    /// Map a goal id to its kind; unrecognized ids behave as maintain
    pub fn from_id(id: i64) -> Self {
        match id {
            1 => GoalKind::Lose,
            3 => GoalKind::Gain,
            _ => GoalKind::Maintain,
        }
    }
}

/// Computed daily targets, all rounded to whole units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalTargets {
    pub calories_goal: i64,
    pub protein_goal: i64, // grams
    pub fat_goal: i64,     // grams
    pub carbs_goal: i64,   // grams
}

/// Activity factor for an activity level id
///
/// Canonical levels 1-4 (sedentary through very active); anything else
/// falls back to the sedentary factor.
pub fn activity_multiplier(activity_level_id: i64) -> f64 {
    match activity_level_id {
        1 => 1.2,
        2 => 1.375,
        3 => 1.55,
        4 => 1.725,
        other => {
            tracing::warn!(activity_level_id = other, "unrecognized activity level, using sedentary factor");
            1.2
        }
    }
}

/// Mifflin-St Jeor basal metabolic rate (kcal/day)
///
/// `10·w + 6.25·h − 5·age` plus a gender offset: +5 male, −161 female,
/// −78 other (midpoint of the two).
fn basal_metabolic_rate(age: u32, gender: Gender, height_cm: f64, weight_kg: f64) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age);
    match gender {
        Gender::Male => base + 5.0,
        Gender::Female => base - 161.0,
        Gender::Other => base - 78.0,
    }
}

/// Daily calorie floor per gender (kcal)
fn calorie_floor(gender: Gender) -> f64 {
    match gender {
        Gender::Male => 1500.0,
        Gender::Female => 1200.0,
        Gender::Other => 1350.0,
    }
}

/// Round half-up to the nearest integer
///
/// The one rounding mode used everywhere targets and statistics are
/// reduced to whole numbers.
pub(crate) fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Compute the daily calorie and macro targets for a profile
///
/// Macros are derived from the unrounded calorie value:
/// protein = weight × 1.8 g, fat = 30% of calories at 9 kcal/g, carbs take
/// the remaining calories at 4 kcal/g. Carbs can go negative on extreme
/// input and are deliberately not clamped.
pub fn compute_daily_goals(
    age: u32,
    gender: Gender,
    height_cm: f64,
    weight_kg: f64,
    activity_level_id: i64,
    goal_id: i64,
) -> GoalTargets {
    let bmr = basal_metabolic_rate(age, gender, height_cm, weight_kg);
    let tdee = bmr * activity_multiplier(activity_level_id);

    let adjusted = match GoalKind::from_id(goal_id) {
        GoalKind::Lose => tdee - GOAL_CALORIE_ADJUSTMENT,
        GoalKind::Gain => tdee + GOAL_CALORIE_ADJUSTMENT,
        GoalKind::Maintain => tdee,
    };

    let calories = adjusted.max(calorie_floor(gender));

    let protein_g = weight_kg * PROTEIN_G_PER_KG;
    let fat_kcal = calories * FAT_CALORIE_SHARE;
    let fat_g = fat_kcal / KCAL_PER_G_FAT;
    let carbs_g = (calories - protein_g * KCAL_PER_G_PROTEIN - fat_kcal) / KCAL_PER_G_CARBS;

    GoalTargets {
        calories_goal: round_half_up(calories),
        protein_goal: round_half_up(protein_g),
        fat_goal: round_half_up(fat_g),
        carbs_goal: round_half_up(carbs_g),
    }
}
