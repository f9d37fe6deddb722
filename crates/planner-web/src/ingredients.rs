//! Handlers for ingredient endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/ingredient/new/` | Existing ingredients |
//! | `POST` | `/ingredient/new/` | Fields `name`, `unit`; redirects back |
//! | `GET`  | `/ingredient/{id}/` | 404 if not found |
//! | `POST` | `/ingredient/{id}/` | Same fields as create; 404 if not found |
//! | `POST` | `/ingredient/{id}/delete/` | Also drops the recipe rows using it |

use std::sync::Arc;

use axum::{
  Form, Json,
  extract::{Path, State},
  response::Redirect,
};
use planner_core::{form::parse_ingredient_form, model::Ingredient, store::PlannerStore};
use serde::Serialize;

use crate::error::ApiError;

const DUPLICATE_NAME: &str = "Ingredient with this Name already exists.";

/// Context for the ingredient form: the ingredient being edited, if any, and
/// the ones already defined.
#[derive(Debug, Serialize)]
pub struct IngredientFormView {
  pub ingredient:  Option<Ingredient>,
  pub ingredients: Vec<Ingredient>,
}

async fn form_view<S: PlannerStore>(
  store: &S,
  ingredient: Option<Ingredient>,
) -> Result<IngredientFormView, ApiError> {
  let ingredients = store.list_ingredients().await.map_err(ApiError::store)?;
  Ok(IngredientFormView { ingredient, ingredients })
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `GET /ingredient/new/`
pub async fn new_form<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<IngredientFormView>, ApiError>
where
  S: PlannerStore,
{
  form_view(&*store, None).await.map(Json)
}

/// `POST /ingredient/new/`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Form(data): Form<Vec<(String, String)>>,
) -> Result<Redirect, ApiError>
where
  S: PlannerStore,
{
  let input = parse_ingredient_form(&data)?;
  let ingredient = store
    .add_ingredient(input)
    .await
    .map_err(|e| ApiError::conflict_on(e, "name", DUPLICATE_NAME))?;
  tracing::info!(
    ingredient_id = ingredient.ingredient_id,
    name = %ingredient.name,
    "ingredient created"
  );
  Ok(Redirect::to("/ingredient/new/"))
}

// ─── Edit ─────────────────────────────────────────────────────────────────────

/// `GET /ingredient/{id}/`
pub async fn edit_form<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<IngredientFormView>, ApiError>
where
  S: PlannerStore,
{
  let ingredient = store
    .get_ingredient(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("ingredient {id} not found")))?;
  form_view(&*store, Some(ingredient)).await.map(Json)
}

/// `POST /ingredient/{id}/`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Form(data): Form<Vec<(String, String)>>,
) -> Result<Redirect, ApiError>
where
  S: PlannerStore,
{
  if store.get_ingredient(id).await.map_err(ApiError::store)?.is_none() {
    return Err(ApiError::NotFound(format!("ingredient {id} not found")));
  }
  let input = parse_ingredient_form(&data)?;
  let ingredient = store
    .update_ingredient(id, input)
    .await
    .map_err(|e| ApiError::conflict_on(e, "name", DUPLICATE_NAME))?;
  tracing::info!(ingredient_id = id, name = %ingredient.name, "ingredient updated");
  Ok(Redirect::to("/ingredient/new/"))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `POST /ingredient/{id}/delete/`
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Redirect, ApiError>
where
  S: PlannerStore,
{
  if !store.delete_ingredient(id).await.map_err(ApiError::store)? {
    return Err(ApiError::NotFound(format!("ingredient {id} not found")));
  }
  tracing::info!(ingredient_id = id, "ingredient deleted");
  Ok(Redirect::to("/ingredient/new/"))
}
