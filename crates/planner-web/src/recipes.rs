//! Handlers for recipe endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/recipes/` | Sorted by name |
//! | `GET`  | `/recipe/new/` | Choosable ingredients |
//! | `POST` | `/recipe/new/` | Field `name` + `lines-<n>-*` formset |
//! | `GET`  | `/recipe/{id}/` | 404 if not found |
//! | `POST` | `/recipe/{id}/` | Replaces name and every ingredient row; 404 if not found |
//! | `POST` | `/recipe/{id}/delete/` | Also removes it from the plan |

use std::sync::Arc;

use axum::{
  Form, Json,
  extract::{Path, State},
  response::Redirect,
};
use planner_core::{
  form::parse_recipe_form,
  model::{Ingredient, Recipe, RecipeDetail, RecipeDraft},
  store::PlannerStore,
};
use serde::Serialize;

use crate::error::ApiError;

const DUPLICATE_NAME: &str = "Recipe with this Name already exists.";

/// Context for the recipe form.
#[derive(Debug, Serialize)]
pub struct RecipeFormView {
  /// `None` on the create form.
  pub recipe:      Option<RecipeDetail>,
  pub ingredients: Vec<Ingredient>,
}

async fn form_view<S: PlannerStore>(
  store: &S,
  recipe: Option<RecipeDetail>,
) -> Result<RecipeFormView, ApiError> {
  let ingredients = store.list_ingredients().await.map_err(ApiError::store)?;
  Ok(RecipeFormView { recipe, ingredients })
}

/// Validate a submitted recipe against the ingredients that currently exist.
async fn parse_draft<S: PlannerStore>(
  store: &S,
  data: &[(String, String)],
) -> Result<RecipeDraft, ApiError> {
  let ingredient_ids: Vec<i64> = store
    .list_ingredients()
    .await
    .map_err(ApiError::store)?
    .iter()
    .map(|i| i.ingredient_id)
    .collect();
  Ok(parse_recipe_form(data, &ingredient_ids)?)
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /recipes/`
pub async fn list<S>(State(store): State<Arc<S>>) -> Result<Json<Vec<Recipe>>, ApiError>
where
  S: PlannerStore,
{
  let recipes = store.list_recipes().await.map_err(ApiError::store)?;
  Ok(Json(recipes))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `GET /recipe/new/`
pub async fn new_form<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<RecipeFormView>, ApiError>
where
  S: PlannerStore,
{
  form_view(&*store, None).await.map(Json)
}

/// `POST /recipe/new/`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Form(data): Form<Vec<(String, String)>>,
) -> Result<Redirect, ApiError>
where
  S: PlannerStore,
{
  let draft = parse_draft(&*store, &data).await?;
  let detail = store
    .add_recipe(draft)
    .await
    .map_err(|e| ApiError::conflict_on(e, "name", DUPLICATE_NAME))?;
  let id = detail.recipe.recipe_id;
  tracing::info!(
    recipe_id = id,
    name = %detail.recipe.name,
    lines = detail.lines.len(),
    "recipe created"
  );
  Ok(Redirect::to(&format!("/recipe/{id}/")))
}

// ─── Edit ─────────────────────────────────────────────────────────────────────

/// `GET /recipe/{id}/`
pub async fn edit_form<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<RecipeFormView>, ApiError>
where
  S: PlannerStore,
{
  let detail = store
    .get_recipe(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("recipe {id} not found")))?;
  form_view(&*store, Some(detail)).await.map(Json)
}

/// `POST /recipe/{id}/`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Form(data): Form<Vec<(String, String)>>,
) -> Result<Redirect, ApiError>
where
  S: PlannerStore,
{
  if store.get_recipe(id).await.map_err(ApiError::store)?.is_none() {
    return Err(ApiError::NotFound(format!("recipe {id} not found")));
  }
  let draft = parse_draft(&*store, &data).await?;
  let detail = store
    .update_recipe(id, draft)
    .await
    .map_err(|e| ApiError::conflict_on(e, "name", DUPLICATE_NAME))?;
  tracing::info!(
    recipe_id = id,
    name = %detail.recipe.name,
    lines = detail.lines.len(),
    "recipe updated"
  );
  Ok(Redirect::to(&format!("/recipe/{id}/")))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `POST /recipe/{id}/delete/`
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Redirect, ApiError>
where
  S: PlannerStore,
{
  if !store.delete_recipe(id).await.map_err(ApiError::store)? {
    return Err(ApiError::NotFound(format!("recipe {id} not found")));
  }
  tracing::info!(recipe_id = id, "recipe deleted");
  Ok(Redirect::to("/recipes/"))
}
