//! Daily nutrition goals
//!
//! Pure goal math (`calculator`) and the read-through resolution that
//! lazily persists a day's targets (`resolver`).

mod calculator;
mod resolver;

pub use calculator::{activity_multiplier, compute_daily_goals, GoalKind, GoalTargets};
pub(crate) use calculator::round_half_up;
pub use resolver::{
    refresh_for_profile_change, resolve_daily_goal, stored_or_default_targets, ResolvedGoal,
    DEFAULT_CALORIES_GOAL, DEFAULT_CARBS_GOAL, DEFAULT_FAT_GOAL, DEFAULT_PROTEIN_GOAL,
};
