//! The `PlannerStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `planner-store-sqlite`).
//! The web layer depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::model::{
  Assignment, Ingredient, MealSlot, NewIngredient, Recipe, RecipeDetail,
  RecipeDraft, RecipeLine, SlotCoordinate, SlotDetail, SlotRow,
};

// ─── Error classification ────────────────────────────────────────────────────

/// Backend errors must say whether a failure is one a caller can act on.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// The write was refused by a uniqueness constraint (duplicate name,
  /// duplicate slot coordinate, duplicate assignment).
  fn is_conflict(&self) -> bool;

  /// The operation referenced a row that does not exist.
  fn is_not_found(&self) -> bool;
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a planner storage backend.
///
/// Uniqueness invariants (ingredient and recipe names, one slot per
/// coordinate, one row per recipe/ingredient and slot/recipe pair) are
/// enforced by the backend and surface as conflict errors.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait PlannerStore: Send + Sync {
  type Error: StoreError;

  // ── Ingredients ───────────────────────────────────────────────────────

  fn add_ingredient(
    &self,
    input: NewIngredient,
  ) -> impl Future<Output = Result<Ingredient, Self::Error>> + Send + '_;

  fn get_ingredient(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Ingredient>, Self::Error>> + Send + '_;

  /// All ingredients, sorted by name.
  fn list_ingredients(
    &self,
  ) -> impl Future<Output = Result<Vec<Ingredient>, Self::Error>> + Send + '_;

  /// Rename an ingredient or change its unit. Errors if `id` is unknown.
  fn update_ingredient(
    &self,
    id: i64,
    input: NewIngredient,
  ) -> impl Future<Output = Result<Ingredient, Self::Error>> + Send + '_;

  /// Delete an ingredient and every recipe row that uses it. Returns `false`
  /// if nothing was deleted.
  fn delete_ingredient(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Recipes ───────────────────────────────────────────────────────────

  fn add_recipe(
    &self,
    draft: RecipeDraft,
  ) -> impl Future<Output = Result<RecipeDetail, Self::Error>> + Send + '_;

  /// Retrieve a recipe with its ingredient rows. Returns `None` if not found.
  fn get_recipe(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<RecipeDetail>, Self::Error>> + Send + '_;

  /// All recipes, sorted by name.
  fn list_recipes(
    &self,
  ) -> impl Future<Output = Result<Vec<Recipe>, Self::Error>> + Send + '_;

  /// Replace a recipe's name and its full set of ingredient rows in one
  /// transaction. Errors if `id` is unknown.
  fn update_recipe(
    &self,
    id: i64,
    draft: RecipeDraft,
  ) -> impl Future<Output = Result<RecipeDetail, Self::Error>> + Send + '_;

  /// Delete a recipe, its ingredient rows and its slot assignments. Returns
  /// `false` if nothing was deleted.
  fn delete_recipe(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Slots ─────────────────────────────────────────────────────────────

  /// Return the slot at `coord`, creating it if absent. The flag is `true`
  /// when a new slot was created.
  fn get_or_create_slot(
    &self,
    coord: SlotCoordinate,
  ) -> impl Future<Output = Result<(MealSlot, bool), Self::Error>> + Send + '_;

  /// Create the slot at `coord`. Fails with a conflict if one already exists.
  fn create_slot(
    &self,
    coord: SlotCoordinate,
  ) -> impl Future<Output = Result<MealSlot, Self::Error>> + Send + '_;

  /// Retrieve a slot with its assigned recipes. Returns `None` if not found.
  fn get_slot(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<SlotDetail>, Self::Error>> + Send + '_;

  /// Replace the recipes assigned to a slot in one transaction.
  /// Errors if the slot or any recipe is unknown.
  fn set_slot_recipes<'a>(
    &'a self,
    slot_id: i64,
    recipe_ids: &'a [i64],
  ) -> impl Future<Output = Result<SlotDetail, Self::Error>> + Send + 'a;

  /// Every persisted slot with its raw codes and assigned recipes.
  fn list_slot_rows(
    &self,
  ) -> impl Future<Output = Result<Vec<SlotRow>, Self::Error>> + Send + '_;

  /// Delete every slot (and with them every assignment). Returns the number
  /// of slots removed.
  fn reset_plan(
    &self,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  // ── Aggregation reads ─────────────────────────────────────────────────

  /// Every slot → recipe assignment currently planned.
  fn list_assignments(
    &self,
  ) -> impl Future<Output = Result<Vec<Assignment>, Self::Error>> + Send + '_;

  /// The ingredient rows of the given recipes.
  fn recipe_lines<'a>(
    &'a self,
    recipe_ids: &'a [i64],
  ) -> impl Future<Output = Result<Vec<RecipeLine>, Self::Error>> + Send + 'a;
}
