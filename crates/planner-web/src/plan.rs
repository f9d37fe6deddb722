//! Handlers for the weekly plan itself.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/` | The 7 × 4 grid |
//! | `POST` | `/reset/` | Deletes every slot; redirects to `/` |

use std::sync::Arc;

use axum::{Json, extract::State, response::Redirect};
use planner_core::{
  grid::{WeekGrid, weekly_grid},
  store::PlannerStore,
};

use crate::error::ApiError;

/// `GET /`
pub async fn index<S>(State(store): State<Arc<S>>) -> Result<Json<WeekGrid>, ApiError>
where
  S: PlannerStore,
{
  let grid = weekly_grid(&*store).await.map_err(ApiError::store)?;
  Ok(Json(grid))
}

/// `POST /reset/`
pub async fn reset<S>(State(store): State<Arc<S>>) -> Result<Redirect, ApiError>
where
  S: PlannerStore,
{
  let removed = store.reset_plan().await.map_err(ApiError::store)?;
  tracing::info!(slots = removed, "weekly plan reset");
  Ok(Redirect::to("/"))
}
