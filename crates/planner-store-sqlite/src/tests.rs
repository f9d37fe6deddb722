//! Integration tests for `SqliteStore` against an in-memory database.

use planner_core::{
  grid::weekly_grid,
  model::{
    Day, IngredientAmount, MealType, NewIngredient, RecipeDraft, SlotCoordinate,
  },
  shopping::shopping_list,
  store::{PlannerStore, StoreError as _},
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn ingredient(name: &str, unit: &str) -> NewIngredient {
  NewIngredient { name: name.into(), unit: unit.into() }
}

fn draft(name: &str, lines: &[(i64, f64)]) -> RecipeDraft {
  RecipeDraft {
    name:  name.into(),
    lines: lines
      .iter()
      .map(|&(ingredient_id, quantity)| IngredientAmount { ingredient_id, quantity })
      .collect(),
  }
}

fn coord(day: Day, meal_type: MealType) -> SlotCoordinate {
  SlotCoordinate::new(day, meal_type)
}

// ─── Ingredients ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_ingredient() {
  let s = store().await;

  let flour = s.add_ingredient(ingredient("Flour", "g")).await.unwrap();
  assert_eq!(flour.name, "Flour");

  let fetched = s.get_ingredient(flour.ingredient_id).await.unwrap();
  assert_eq!(fetched, Some(flour));
}

#[tokio::test]
async fn get_ingredient_missing_returns_none() {
  let s = store().await;
  assert!(s.get_ingredient(42).await.unwrap().is_none());
}

#[tokio::test]
async fn ingredient_names_are_unique_but_case_sensitive() {
  let s = store().await;
  s.add_ingredient(ingredient("Flour", "g")).await.unwrap();

  let err = s.add_ingredient(ingredient("Flour", "kg")).await.unwrap_err();
  assert!(matches!(err, Error::Conflict(_)));
  assert!(err.is_conflict());

  s.add_ingredient(ingredient("flour", "g")).await.unwrap();
  assert_eq!(s.list_ingredients().await.unwrap().len(), 2);
}

#[tokio::test]
async fn list_ingredients_sorted_by_name() {
  let s = store().await;
  s.add_ingredient(ingredient("Sugar", "g")).await.unwrap();
  s.add_ingredient(ingredient("Egg", "pezzi")).await.unwrap();
  s.add_ingredient(ingredient("Milk", "ml")).await.unwrap();

  let names: Vec<String> = s
    .list_ingredients()
    .await
    .unwrap()
    .into_iter()
    .map(|i| i.name)
    .collect();
  assert_eq!(names, ["Egg", "Milk", "Sugar"]);
}

#[tokio::test]
async fn update_ingredient_changes_unit() {
  let s = store().await;
  let milk = s.add_ingredient(ingredient("Milk", "ml")).await.unwrap();

  let updated = s
    .update_ingredient(milk.ingredient_id, ingredient("Milk", "l"))
    .await
    .unwrap();
  assert_eq!(updated.unit, "l");

  let err = s.update_ingredient(999, ingredient("X", "g")).await.unwrap_err();
  assert!(matches!(err, Error::IngredientNotFound(999)));
  assert!(err.is_not_found());
}

#[tokio::test]
async fn deleting_ingredient_cascades_to_recipe_lines() {
  let s = store().await;
  let flour = s.add_ingredient(ingredient("Flour", "g")).await.unwrap();
  let egg = s.add_ingredient(ingredient("Egg", "pezzi")).await.unwrap();
  let pasta = s
    .add_recipe(draft("Pasta", &[(flour.ingredient_id, 200.0), (egg.ingredient_id, 2.0)]))
    .await
    .unwrap();

  assert!(s.delete_ingredient(egg.ingredient_id).await.unwrap());
  assert!(!s.delete_ingredient(egg.ingredient_id).await.unwrap());

  let detail = s.get_recipe(pasta.recipe.recipe_id).await.unwrap().unwrap();
  assert_eq!(detail.lines.len(), 1);
  assert_eq!(detail.lines[0].ingredient_name, "Flour");
}

// ─── Recipes ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_recipe_with_lines() {
  let s = store().await;
  let flour = s.add_ingredient(ingredient("Flour", "g")).await.unwrap();
  let egg = s.add_ingredient(ingredient("Egg", "pezzi")).await.unwrap();

  let detail = s
    .add_recipe(draft("Pasta", &[(flour.ingredient_id, 200.0), (egg.ingredient_id, 2.0)]))
    .await
    .unwrap();

  assert_eq!(detail.recipe.name, "Pasta");
  // Lines come back ordered by ingredient name.
  let names: Vec<&str> =
    detail.lines.iter().map(|l| l.ingredient_name.as_str()).collect();
  assert_eq!(names, ["Egg", "Flour"]);
  assert_eq!(detail.lines[1].quantity, 200.0);
  assert_eq!(detail.lines[1].unit, "g");

  let fetched = s.get_recipe(detail.recipe.recipe_id).await.unwrap();
  assert_eq!(fetched, Some(detail));
}

#[tokio::test]
async fn duplicate_recipe_name_conflicts() {
  let s = store().await;
  s.add_recipe(draft("Pasta", &[])).await.unwrap();

  let err = s.add_recipe(draft("Pasta", &[])).await.unwrap_err();
  assert!(err.is_conflict());
  assert_eq!(s.list_recipes().await.unwrap().len(), 1);
}

#[tokio::test]
async fn recipe_with_unknown_ingredient_is_rejected_atomically() {
  let s = store().await;

  let err = s.add_recipe(draft("Ghost", &[(77, 1.0)])).await.unwrap_err();
  assert!(matches!(err, Error::MissingReference(_)));
  assert!(s.list_recipes().await.unwrap().is_empty());
}

#[tokio::test]
async fn update_recipe_replaces_lines() {
  let s = store().await;
  let flour = s.add_ingredient(ingredient("Flour", "g")).await.unwrap();
  let egg = s.add_ingredient(ingredient("Egg", "pezzi")).await.unwrap();
  let pasta = s
    .add_recipe(draft("Pasta", &[(flour.ingredient_id, 200.0)]))
    .await
    .unwrap();
  let id = pasta.recipe.recipe_id;

  let updated = s
    .update_recipe(id, draft("Pasta fresca", &[(egg.ingredient_id, 3.0)]))
    .await
    .unwrap();

  assert_eq!(updated.recipe.name, "Pasta fresca");
  assert_eq!(updated.lines.len(), 1);
  assert_eq!(updated.lines[0].ingredient_id, egg.ingredient_id);
  assert_eq!(updated.lines[0].quantity, 3.0);
}

#[tokio::test]
async fn failed_update_leaves_recipe_untouched() {
  let s = store().await;
  let flour = s.add_ingredient(ingredient("Flour", "g")).await.unwrap();
  s.add_recipe(draft("Pizza", &[])).await.unwrap();
  let pasta = s
    .add_recipe(draft("Pasta", &[(flour.ingredient_id, 200.0)]))
    .await
    .unwrap();
  let id = pasta.recipe.recipe_id;

  let err = s.update_recipe(id, draft("Pizza", &[])).await.unwrap_err();
  assert!(err.is_conflict());

  let after = s.get_recipe(id).await.unwrap().unwrap();
  assert_eq!(after, pasta);
}

#[tokio::test]
async fn update_missing_recipe_errors() {
  let s = store().await;
  let err = s.update_recipe(5, draft("Nope", &[])).await.unwrap_err();
  assert!(matches!(err, Error::RecipeNotFound(5)));
}

#[tokio::test]
async fn delete_recipe_removes_assignments() {
  let s = store().await;
  let pasta = s.add_recipe(draft("Pasta", &[])).await.unwrap();
  let id = pasta.recipe.recipe_id;
  let (slot, _) = s
    .get_or_create_slot(coord(Day::Monday, MealType::Lunch))
    .await
    .unwrap();
  s.set_slot_recipes(slot.slot_id, &[id]).await.unwrap();

  assert!(s.delete_recipe(id).await.unwrap());
  assert!(s.get_recipe(id).await.unwrap().is_none());
  assert!(s.list_assignments().await.unwrap().is_empty());
  // The slot itself survives.
  assert!(s.get_slot(slot.slot_id).await.unwrap().is_some());
}

// ─── Slots ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn get_or_create_slot_reports_creation_once() {
  let s = store().await;

  let (first, created) = s
    .get_or_create_slot(coord(Day::Tuesday, MealType::Dinner))
    .await
    .unwrap();
  assert!(created);
  assert_eq!(first.day, Day::Tuesday);
  assert_eq!(first.meal_type, MealType::Dinner);

  let (again, created) = s
    .get_or_create_slot(coord(Day::Tuesday, MealType::Dinner))
    .await
    .unwrap();
  assert!(!created);
  assert_eq!(again, first);
}

#[tokio::test]
async fn create_slot_rejects_duplicate_coordinate() {
  let s = store().await;
  let first = s
    .create_slot(coord(Day::Friday, MealType::Breakfast))
    .await
    .unwrap();

  let err = s
    .create_slot(coord(Day::Friday, MealType::Breakfast))
    .await
    .unwrap_err();
  assert!(err.is_conflict());

  let rows = s.list_slot_rows().await.unwrap();
  assert_eq!(rows.len(), 1);
  assert_eq!(rows[0].slot_id, first.slot_id);
}

#[tokio::test]
async fn set_slot_recipes_replaces_assignments() {
  let s = store().await;
  let pasta = s.add_recipe(draft("Pasta", &[])).await.unwrap().recipe;
  let salad = s.add_recipe(draft("Insalata", &[])).await.unwrap().recipe;
  let (slot, _) = s
    .get_or_create_slot(coord(Day::Monday, MealType::Dinner))
    .await
    .unwrap();

  let detail = s
    .set_slot_recipes(slot.slot_id, &[pasta.recipe_id, salad.recipe_id])
    .await
    .unwrap();
  let names: Vec<&str> = detail.recipes.iter().map(|r| r.name.as_str()).collect();
  assert_eq!(names, ["Insalata", "Pasta"]);

  let detail = s.set_slot_recipes(slot.slot_id, &[salad.recipe_id]).await.unwrap();
  assert_eq!(detail.recipes, vec![salad]);
  assert_eq!(s.list_assignments().await.unwrap().len(), 1);
}

#[tokio::test]
async fn set_slot_recipes_rejects_double_assignment() {
  let s = store().await;
  let pasta = s.add_recipe(draft("Pasta", &[])).await.unwrap().recipe;
  let (slot, _) = s
    .get_or_create_slot(coord(Day::Monday, MealType::Dinner))
    .await
    .unwrap();
  s.set_slot_recipes(slot.slot_id, &[pasta.recipe_id]).await.unwrap();

  let err = s
    .set_slot_recipes(slot.slot_id, &[pasta.recipe_id, pasta.recipe_id])
    .await
    .unwrap_err();
  assert!(err.is_conflict());

  // The transaction rolled back; the earlier assignment is intact.
  let detail = s.get_slot(slot.slot_id).await.unwrap().unwrap();
  assert_eq!(detail.recipes, vec![pasta]);
}

#[tokio::test]
async fn set_recipes_on_missing_slot_errors() {
  let s = store().await;
  let err = s.set_slot_recipes(9, &[]).await.unwrap_err();
  assert!(matches!(err, Error::SlotNotFound(9)));
}

#[tokio::test]
async fn reset_plan_clears_every_slot() {
  let s = store().await;
  let pasta = s.add_recipe(draft("Pasta", &[])).await.unwrap().recipe;
  for day in [Day::Monday, Day::Wednesday, Day::Saturday] {
    let (slot, _) = s.get_or_create_slot(coord(day, MealType::Lunch)).await.unwrap();
    s.set_slot_recipes(slot.slot_id, &[pasta.recipe_id]).await.unwrap();
  }

  assert_eq!(s.reset_plan().await.unwrap(), 3);
  assert!(s.list_slot_rows().await.unwrap().is_empty());
  assert!(s.list_assignments().await.unwrap().is_empty());
  // Recipes are not part of the plan.
  assert_eq!(s.list_recipes().await.unwrap().len(), 1);
}

// ─── Grid and shopping list ──────────────────────────────────────────────────

#[tokio::test]
async fn weekly_grid_reflects_slots() {
  let s = store().await;
  let pasta = s.add_recipe(draft("Pasta", &[])).await.unwrap().recipe;
  let (slot, _) = s
    .get_or_create_slot(coord(Day::Thursday, MealType::Snack))
    .await
    .unwrap();
  s.set_slot_recipes(slot.slot_id, &[pasta.recipe_id]).await.unwrap();
  s.get_or_create_slot(coord(Day::Sunday, MealType::Lunch)).await.unwrap();

  let grid = weekly_grid(&s).await.unwrap();
  assert_eq!(grid.cell_count(), 28);
  assert_eq!(grid.cell(Day::Thursday, MealType::Snack).recipes, vec![pasta]);
  let sunday = grid.cell(Day::Sunday, MealType::Lunch);
  assert!(sunday.slot_id.is_some());
  assert!(sunday.is_empty());
}

#[tokio::test]
async fn shopping_list_empty_plan() {
  let s = store().await;
  s.add_recipe(draft("Pasta", &[])).await.unwrap();
  assert!(shopping_list(&s).await.unwrap().is_empty());
}

#[tokio::test]
async fn shopping_list_counts_each_slot_occurrence() {
  let s = store().await;
  let flour = s.add_ingredient(ingredient("Flour", "g")).await.unwrap();
  let egg = s.add_ingredient(ingredient("Egg", "pezzi")).await.unwrap();
  let pasta = s
    .add_recipe(draft("Pasta", &[(flour.ingredient_id, 200.0), (egg.ingredient_id, 2.0)]))
    .await
    .unwrap()
    .recipe;
  // Defined but never scheduled: must not contribute.
  s.add_recipe(draft("Torta", &[(flour.ingredient_id, 500.0)]))
    .await
    .unwrap();

  for c in [coord(Day::Monday, MealType::Lunch), coord(Day::Wednesday, MealType::Dinner)] {
    let (slot, _) = s.get_or_create_slot(c).await.unwrap();
    s.set_slot_recipes(slot.slot_id, &[pasta.recipe_id]).await.unwrap();
  }

  let items = shopping_list(&s).await.unwrap();
  let summary: Vec<(&str, &str, f64)> = items
    .iter()
    .map(|i| (i.name.as_str(), i.unit.as_str(), i.total_quantity))
    .collect();
  assert_eq!(summary, [("Egg", "pezzi", 4.0), ("Flour", "g", 400.0)]);
}

#[tokio::test]
async fn shopping_list_merges_unit_spellings() {
  let s = store().await;
  let flour = s.add_ingredient(ingredient("Flour", "G ")).await.unwrap();
  let pasta = s
    .add_recipe(draft("Pasta", &[(flour.ingredient_id, 100.0)]))
    .await
    .unwrap()
    .recipe;
  let pizza = s
    .add_recipe(draft("Pizza", &[(flour.ingredient_id, 300.0)]))
    .await
    .unwrap()
    .recipe;
  let (slot, _) = s
    .get_or_create_slot(coord(Day::Saturday, MealType::Dinner))
    .await
    .unwrap();
  s.set_slot_recipes(slot.slot_id, &[pasta.recipe_id, pizza.recipe_id])
    .await
    .unwrap();

  let items = shopping_list(&s).await.unwrap();
  assert_eq!(items.len(), 1);
  assert_eq!(items[0].unit, "g");
  assert_eq!(items[0].total_quantity, 400.0);
}

#[tokio::test]
async fn recipe_lines_restricted_to_requested_recipes() {
  let s = store().await;
  let flour = s.add_ingredient(ingredient("Flour", "g")).await.unwrap();
  let a = s.add_recipe(draft("A", &[(flour.ingredient_id, 1.0)])).await.unwrap();
  s.add_recipe(draft("B", &[(flour.ingredient_id, 2.0)])).await.unwrap();

  let lines = s.recipe_lines(&[a.recipe.recipe_id]).await.unwrap();
  assert_eq!(lines.len(), 1);
  assert_eq!(lines[0].recipe_id, a.recipe.recipe_id);
  assert!(s.recipe_lines(&[]).await.unwrap().is_empty());
}
