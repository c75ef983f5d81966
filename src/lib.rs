//! Macrotrack Library
//!
//! Core engine for a personal fitness/nutrition tracker: daily nutrition
//! goal computation and rolling activity statistics over logged meals and
//! workouts. The surrounding web/API layer owns routing and authentication
//! and hands this crate an already-resolved user id.

pub mod db;
pub mod goals;
pub mod models;
pub mod stats;
