//! Shopping-list aggregation.
//!
//! Turns the current slot → recipe assignments into one total per
//! (ingredient, unit). A recipe planned in several slots contributes once per
//! slot. Unit labels are trimmed and lower-cased before grouping, so `"G "`
//! and `"g"` land on the same line; no conversion between measurement systems
//! is attempted.

use std::collections::{HashMap, hash_map::Entry};

use serde::{Deserialize, Serialize};

use crate::{
  model::{Assignment, RecipeLine},
  store::PlannerStore,
};

/// One line of the shopping list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingItem {
  pub ingredient_id:  i64,
  pub name:           String,
  /// Normalised unit label.
  pub unit:           String,
  pub total_quantity: f64,
}

/// Grouping form of a unit label: surrounding whitespace trimmed, lower case.
pub fn normalize_unit(unit: &str) -> String { unit.trim().to_lowercase() }

/// How many times each recipe is planned across all slots.
pub fn recipe_counts(assignments: &[Assignment]) -> HashMap<i64, u32> {
  let mut counts = HashMap::new();
  for a in assignments {
    *counts.entry(a.recipe_id).or_insert(0) += 1;
  }
  counts
}

/// Aggregate `lines` over `assignments`.
///
/// Lines belonging to recipes that are not planned are ignored. The result
/// holds one entry per (ingredient id, normalised unit), sorted by name then
/// unit; the ingredient id breaks any remaining tie.
pub fn aggregate(
  assignments: &[Assignment],
  lines: &[RecipeLine],
) -> Vec<ShoppingItem> {
  let counts = recipe_counts(assignments);
  let mut totals: HashMap<(i64, String), ShoppingItem> = HashMap::new();

  for line in lines {
    let Some(&count) = counts.get(&line.recipe_id) else {
      continue;
    };
    let contributed = line.quantity * f64::from(count);

    match totals.entry((line.ingredient_id, normalize_unit(&line.unit))) {
      Entry::Occupied(mut e) => e.get_mut().total_quantity += contributed,
      Entry::Vacant(e) => {
        let unit = e.key().1.clone();
        e.insert(ShoppingItem {
          ingredient_id: line.ingredient_id,
          name: line.ingredient_name.clone(),
          unit,
          total_quantity: contributed,
        });
      }
    }
  }

  let mut items: Vec<ShoppingItem> = totals.into_values().collect();
  items.sort_by(|a, b| {
    a.name
      .cmp(&b.name)
      .then_with(|| a.unit.cmp(&b.unit))
      .then_with(|| a.ingredient_id.cmp(&b.ingredient_id))
  });
  items
}

/// Compute the shopping list for everything currently planned in `store`.
///
/// Recomputed on every call; nothing is cached.
pub async fn shopping_list<S: PlannerStore>(
  store: &S,
) -> Result<Vec<ShoppingItem>, S::Error> {
  let assignments = store.list_assignments().await?;
  if assignments.is_empty() {
    return Ok(Vec::new());
  }

  let mut planned: Vec<i64> = recipe_counts(&assignments).into_keys().collect();
  planned.sort_unstable();

  let lines = store.recipe_lines(&planned).await?;
  Ok(aggregate(&assignments, &lines))
}
