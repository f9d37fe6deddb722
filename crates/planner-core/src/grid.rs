//! The weekly grid, a fixed 7 × 4 matrix of day × meal type.

use serde::Serialize;

use crate::{
  model::{Day, MealType, Recipe, SlotRow},
  store::PlannerStore,
};

/// A code/label pair for rendering headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Choice {
  pub code:  &'static str,
  pub label: &'static str,
}

/// One cell of the grid. `slot_id` is `None` when no slot has been created
/// for this coordinate yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridCell {
  pub meal_type: MealType,
  pub slot_id:   Option<i64>,
  pub recipes:   Vec<Recipe>,
}

impl GridCell {
  pub fn is_empty(&self) -> bool { self.recipes.is_empty() }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayRow {
  pub day:   Day,
  pub label: &'static str,
  /// One cell per meal type, in [`MealType::ALL`] order.
  pub cells: Vec<GridCell>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekGrid {
  /// Column headers.
  pub meal_types: Vec<Choice>,
  /// One row per day, in [`Day::ALL`] order.
  pub days:       Vec<DayRow>,
}

impl WeekGrid {
  /// A grid with every cell empty.
  pub fn empty() -> Self {
    let meal_types = MealType::ALL
      .into_iter()
      .map(|m| Choice { code: m.code(), label: m.label() })
      .collect();

    let days = Day::ALL
      .into_iter()
      .map(|day| DayRow {
        day,
        label: day.label(),
        cells: MealType::ALL
          .into_iter()
          .map(|meal_type| GridCell { meal_type, slot_id: None, recipes: Vec::new() })
          .collect(),
      })
      .collect();

    Self { meal_types, days }
  }

  pub fn cell(&self, day: Day, meal_type: MealType) -> &GridCell {
    &self.days[day.index()].cells[meal_type.index()]
  }

  fn cell_mut(&mut self, day: Day, meal_type: MealType) -> &mut GridCell {
    &mut self.days[day.index()].cells[meal_type.index()]
  }

  pub fn cell_count(&self) -> usize {
    self.days.iter().map(|d| d.cells.len()).sum()
  }
}

/// Lay out `slots` on a full week grid.
///
/// Rows whose day or meal code is not enumerated are skipped.
pub fn build_grid(slots: &[SlotRow]) -> WeekGrid {
  let mut grid = WeekGrid::empty();

  for row in slots {
    let (Some(day), Some(meal_type)) =
      (Day::from_code(&row.day), MealType::from_code(&row.meal_type))
    else {
      continue;
    };

    let mut recipes = row.recipes.clone();
    recipes.sort_by(|a, b| a.name.cmp(&b.name));

    let cell = grid.cell_mut(day, meal_type);
    cell.slot_id = Some(row.slot_id);
    cell.recipes = recipes;
  }

  grid
}

/// Build the grid from everything currently persisted in `store`.
pub async fn weekly_grid<S: PlannerStore>(store: &S) -> Result<WeekGrid, S::Error> {
  let rows = store.list_slot_rows().await?;
  Ok(build_grid(&rows))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn recipe(recipe_id: i64, name: &str) -> Recipe {
    Recipe { recipe_id, name: name.into() }
  }

  fn row(slot_id: i64, day: &str, meal: &str, recipes: Vec<Recipe>) -> SlotRow {
    SlotRow {
      slot_id,
      day: day.into(),
      meal_type: meal.into(),
      recipes,
    }
  }

  #[test]
  fn empty_input_yields_full_empty_grid() {
    let grid = build_grid(&[]);
    assert_eq!(grid.cell_count(), 28);
    assert_eq!(grid.days.len(), 7);
    assert_eq!(grid.meal_types.len(), 4);
    assert!(grid.days.iter().flat_map(|d| &d.cells).all(|c| c.is_empty() && c.slot_id.is_none()));
  }

  #[test]
  fn slots_land_in_their_cells() {
    let grid = build_grid(&[
      row(1, "MON", "LUN", vec![recipe(1, "Pasta")]),
      row(2, "WED", "DIN", vec![recipe(2, "Zuppa"), recipe(1, "Pasta")]),
    ]);

    let monday = grid.cell(Day::Monday, MealType::Lunch);
    assert_eq!(monday.slot_id, Some(1));
    assert_eq!(monday.recipes, vec![recipe(1, "Pasta")]);

    let wednesday = grid.cell(Day::Wednesday, MealType::Dinner);
    let names: Vec<&str> = wednesday.recipes.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["Pasta", "Zuppa"]);

    assert!(grid.cell(Day::Monday, MealType::Dinner).is_empty());
    assert_eq!(grid.cell_count(), 28);
  }

  #[test]
  fn slot_without_recipes_keeps_its_id() {
    let grid = build_grid(&[row(7, "SUN", "BRK", vec![])]);
    let cell = grid.cell(Day::Sunday, MealType::Breakfast);
    assert_eq!(cell.slot_id, Some(7));
    assert!(cell.is_empty());
  }

  #[test]
  fn corrupt_codes_are_skipped() {
    let grid = build_grid(&[
      row(1, "XXX", "LUN", vec![recipe(1, "Pasta")]),
      row(2, "MON", "???", vec![recipe(1, "Pasta")]),
      row(3, "TUE", "SNK", vec![recipe(2, "Mela")]),
    ]);

    assert_eq!(grid.cell_count(), 28);
    let filled: Vec<&GridCell> = grid
      .days
      .iter()
      .flat_map(|d| &d.cells)
      .filter(|c| c.slot_id.is_some())
      .collect();
    assert_eq!(filled.len(), 1);
    assert_eq!(filled[0].slot_id, Some(3));
  }

  #[test]
  fn rows_and_columns_follow_enumeration_order() {
    let grid = WeekGrid::empty();
    let days: Vec<Day> = grid.days.iter().map(|d| d.day).collect();
    assert_eq!(days, Day::ALL);
    let codes: Vec<&str> = grid.meal_types.iter().map(|c| c.code).collect();
    assert_eq!(codes, ["BRK", "LUN", "DIN", "SNK"]);
    assert_eq!(grid.days[0].label, "Lunedì");
  }
}
