//! Handlers for meal slot endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/meal-slot/create/{day}/{meal_type}/` | Creates the slot if absent |
//! | `POST` | `/meal-slot/create/{day}/{meal_type}/` | Repeated `recipes=<id>`; nothing is written if invalid |
//! | `GET`  | `/meal-slot/update/{id}/` | 404 if not found |
//! | `POST` | `/meal-slot/update/{id}/` | Replaces the assigned recipes; 404 if not found |
//!
//! Codes are `MON`..`SUN` and `BRK`, `LUN`, `DIN`, `SNK`; anything else is a
//! 400. Saving redirects to `/`.

use std::sync::Arc;

use axum::{
  Form, Json,
  extract::{Path, State},
  response::Redirect,
};
use planner_core::{
  form::parse_slot_form,
  model::{MealSlot, Recipe, SlotCoordinate},
  store::PlannerStore,
};
use serde::Serialize;

use crate::error::ApiError;

/// Context for the slot form.
#[derive(Debug, Serialize)]
pub struct SlotFormView {
  pub slot:       MealSlot,
  pub day_label:  &'static str,
  pub meal_label: &'static str,
  /// Whether this request created the slot.
  pub created:    bool,
  /// Recipes currently assigned.
  pub assigned:   Vec<Recipe>,
  /// Every recipe that may be chosen.
  pub choices:    Vec<Recipe>,
}

async fn provision<S: PlannerStore>(
  store: &S,
  coord: SlotCoordinate,
) -> Result<(MealSlot, bool), ApiError> {
  let (slot, created) = store.get_or_create_slot(coord).await.map_err(ApiError::store)?;
  if created {
    tracing::info!(
      slot_id = slot.slot_id,
      day = coord.day.code(),
      meal_type = coord.meal_type.code(),
      "meal slot created"
    );
  }
  Ok((slot, created))
}

async fn form_view<S: PlannerStore>(
  store: &S,
  slot_id: i64,
  created: bool,
) -> Result<SlotFormView, ApiError> {
  let detail = store
    .get_slot(slot_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("meal slot {slot_id} not found")))?;
  let choices = store.list_recipes().await.map_err(ApiError::store)?;
  Ok(SlotFormView {
    slot: detail.slot,
    day_label: detail.slot.day.label(),
    meal_label: detail.slot.meal_type.label(),
    created,
    assigned: detail.recipes,
    choices,
  })
}

/// Validate a submitted slot form against the recipes that currently exist.
async fn parse_choice<S: PlannerStore>(
  store: &S,
  data: &[(String, String)],
) -> Result<Vec<i64>, ApiError> {
  let choices: Vec<i64> = store
    .list_recipes()
    .await
    .map_err(ApiError::store)?
    .iter()
    .map(|r| r.recipe_id)
    .collect();
  Ok(parse_slot_form(data, &choices)?)
}

async fn save<S: PlannerStore>(
  store: &S,
  slot_id: i64,
  recipe_ids: &[i64],
) -> Result<Redirect, ApiError> {
  let detail = store
    .set_slot_recipes(slot_id, recipe_ids)
    .await
    .map_err(|e| {
      ApiError::conflict_on(e, "recipes", "A recipe can only be assigned once per meal.")
    })?;
  tracing::info!(slot_id, recipes = detail.recipes.len(), "meal slot updated");
  Ok(Redirect::to("/"))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `GET /meal-slot/create/{day}/{meal_type}/`
pub async fn create_form<S>(
  State(store): State<Arc<S>>,
  Path((day, meal_type)): Path<(String, String)>,
) -> Result<Json<SlotFormView>, ApiError>
where
  S: PlannerStore,
{
  let coord = SlotCoordinate::parse(&day, &meal_type)?;
  let (slot, created) = provision(&*store, coord).await?;
  form_view(&*store, slot.slot_id, created).await.map(Json)
}

/// `POST /meal-slot/create/{day}/{meal_type}/`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Path((day, meal_type)): Path<(String, String)>,
  Form(data): Form<Vec<(String, String)>>,
) -> Result<Redirect, ApiError>
where
  S: PlannerStore,
{
  let coord = SlotCoordinate::parse(&day, &meal_type)?;
  // The slot is only materialised once the form is known to be valid.
  let recipe_ids = parse_choice(&*store, &data).await?;
  let (slot, _) = provision(&*store, coord).await?;
  save(&*store, slot.slot_id, &recipe_ids).await
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `GET /meal-slot/update/{id}/`
pub async fn update_form<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<SlotFormView>, ApiError>
where
  S: PlannerStore,
{
  form_view(&*store, id, false).await.map(Json)
}

/// `POST /meal-slot/update/{id}/`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Form(data): Form<Vec<(String, String)>>,
) -> Result<Redirect, ApiError>
where
  S: PlannerStore,
{
  if store.get_slot(id).await.map_err(ApiError::store)?.is_none() {
    return Err(ApiError::NotFound(format!("meal slot {id} not found")));
  }
  let recipe_ids = parse_choice(&*store, &data).await?;
  save(&*store, id, &recipe_ids).await
}
