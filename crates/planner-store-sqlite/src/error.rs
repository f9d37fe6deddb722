//! Error type for `planner-store-sqlite`.

use std::ffi::c_int;

use planner_core::store::StoreError;
use rusqlite::{ErrorCode, ffi};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] planner_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// A UNIQUE or PRIMARY KEY constraint refused the write.
  #[error("conflict: {0}")]
  Conflict(String),

  /// A FOREIGN KEY constraint refused the write.
  #[error("missing reference: {0}")]
  MissingReference(String),

  #[error("ingredient not found: {0}")]
  IngredientNotFound(i64),

  #[error("recipe not found: {0}")]
  RecipeNotFound(i64),

  #[error("meal slot not found: {0}")]
  SlotNotFound(i64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
  /// Classify a failed write, turning constraint violations into
  /// [`Error::Conflict`] or [`Error::MissingReference`] described by `what`.
  pub(crate) fn from_write(err: tokio_rusqlite::Error, what: &str) -> Self {
    match constraint_code(&err) {
      Some(ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY) => {
        Error::Conflict(what.to_owned())
      }
      Some(ffi::SQLITE_CONSTRAINT_FOREIGNKEY) => {
        Error::MissingReference(what.to_owned())
      }
      _ => Error::Database(err),
    }
  }
}

/// The extended result code of a constraint violation, if that is what
/// `err` is.
fn constraint_code(err: &tokio_rusqlite::Error) -> Option<c_int> {
  match err {
    tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(failure, _))
      if failure.code == ErrorCode::ConstraintViolation =>
    {
      Some(failure.extended_code)
    }
    _ => None,
  }
}

impl StoreError for Error {
  fn is_conflict(&self) -> bool { matches!(self, Error::Conflict(_)) }

  fn is_not_found(&self) -> bool {
    matches!(
      self,
      Error::IngredientNotFound(_)
        | Error::RecipeNotFound(_)
        | Error::SlotNotFound(_)
        | Error::MissingReference(_)
    )
  }
}
