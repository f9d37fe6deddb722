//! Error types for `planner-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid slot coordinate: day {day:?}, meal type {meal_type:?}")]
  InvalidSlotCoordinate { day: String, meal_type: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
