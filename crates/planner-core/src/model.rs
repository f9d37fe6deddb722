//! Domain records for the planner.
//!
//! Every persisted entity is identified by its SQLite row id. Join tables
//! (recipe ↔ ingredient, slot ↔ recipe) are plain association records keyed by
//! those ids; nothing derived from them is ever stored.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Calendar codes ──────────────────────────────────────────────────────────

/// A day of the planning week. Serialised as its three-letter code.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Day {
  #[serde(rename = "MON")]
  Monday,
  #[serde(rename = "TUE")]
  Tuesday,
  #[serde(rename = "WED")]
  Wednesday,
  #[serde(rename = "THU")]
  Thursday,
  #[serde(rename = "FRI")]
  Friday,
  #[serde(rename = "SAT")]
  Saturday,
  #[serde(rename = "SUN")]
  Sunday,
}

impl Day {
  /// Every day, in calendar order.
  pub const ALL: [Day; 7] = [
    Self::Monday,
    Self::Tuesday,
    Self::Wednesday,
    Self::Thursday,
    Self::Friday,
    Self::Saturday,
    Self::Sunday,
  ];

  /// The code stored in the `day` column.
  pub fn code(self) -> &'static str {
    match self {
      Self::Monday => "MON",
      Self::Tuesday => "TUE",
      Self::Wednesday => "WED",
      Self::Thursday => "THU",
      Self::Friday => "FRI",
      Self::Saturday => "SAT",
      Self::Sunday => "SUN",
    }
  }

  /// Display label shown in grid headers.
  pub fn label(self) -> &'static str {
    match self {
      Self::Monday => "Lunedì",
      Self::Tuesday => "Martedì",
      Self::Wednesday => "Mercoledì",
      Self::Thursday => "Giovedì",
      Self::Friday => "Venerdì",
      Self::Saturday => "Sabato",
      Self::Sunday => "Domenica",
    }
  }

  pub fn from_code(code: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|d| d.code() == code)
  }

  /// Row position in the weekly grid.
  pub fn index(self) -> usize { self as usize }
}

/// A meal of the day. Serialised as its three-letter code.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum MealType {
  #[serde(rename = "BRK")]
  Breakfast,
  #[serde(rename = "LUN")]
  Lunch,
  #[serde(rename = "DIN")]
  Dinner,
  #[serde(rename = "SNK")]
  Snack,
}

impl MealType {
  /// Every meal type, in the order they are eaten.
  pub const ALL: [MealType; 4] =
    [Self::Breakfast, Self::Lunch, Self::Dinner, Self::Snack];

  /// The code stored in the `meal_type` column.
  pub fn code(self) -> &'static str {
    match self {
      Self::Breakfast => "BRK",
      Self::Lunch => "LUN",
      Self::Dinner => "DIN",
      Self::Snack => "SNK",
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      Self::Breakfast => "Colazione",
      Self::Lunch => "Pranzo",
      Self::Dinner => "Cena",
      Self::Snack => "Snack",
    }
  }

  pub fn from_code(code: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|m| m.code() == code)
  }

  /// Column position in the weekly grid.
  pub fn index(self) -> usize { self as usize }
}

/// A validated (day, meal type) pair: the address of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotCoordinate {
  pub day:       Day,
  pub meal_type: MealType,
}

impl SlotCoordinate {
  pub fn new(day: Day, meal_type: MealType) -> Self { Self { day, meal_type } }

  /// Parse raw codes (as found in a URL or a database row).
  ///
  /// Codes are matched exactly; anything outside the enumerations yields
  /// [`Error::InvalidSlotCoordinate`].
  pub fn parse(day: &str, meal_type: &str) -> Result<Self> {
    match (Day::from_code(day), MealType::from_code(meal_type)) {
      (Some(day), Some(meal_type)) => Ok(Self { day, meal_type }),
      _ => Err(Error::InvalidSlotCoordinate {
        day:       day.to_owned(),
        meal_type: meal_type.to_owned(),
      }),
    }
  }
}

// ─── Ingredients ─────────────────────────────────────────────────────────────

/// Something we buy. `name` is unique (case-sensitive); `unit` is a free-text
/// label such as "g", "ml" or "pezzi".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
  pub ingredient_id: i64,
  pub name:          String,
  pub unit:          String,
}

/// Input to [`crate::store::PlannerStore::add_ingredient`] and
/// [`crate::store::PlannerStore::update_ingredient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIngredient {
  pub name: String,
  pub unit: String,
}

// ─── Recipes ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
  pub recipe_id: i64,
  pub name:      String,
}

/// One ingredient row of a recipe, joined with the ingredient's name and unit.
///
/// This is the read-only view the aggregation engine consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeLine {
  pub recipe_id:       i64,
  pub ingredient_id:   i64,
  pub ingredient_name: String,
  pub unit:            String,
  /// Amount needed for one preparation of the recipe.
  pub quantity:        f64,
}

/// A recipe together with its ingredient rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDetail {
  pub recipe: Recipe,
  pub lines:  Vec<RecipeLine>,
}

/// An ingredient reference with its per-recipe quantity, as submitted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IngredientAmount {
  pub ingredient_id: i64,
  pub quantity:      f64,
}

/// Input to [`crate::store::PlannerStore::add_recipe`] and
/// [`crate::store::PlannerStore::update_recipe`]. `lines` replaces the full
/// set of ingredient rows and never names the same ingredient twice.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeDraft {
  pub name:  String,
  pub lines: Vec<IngredientAmount>,
}

// ─── Meal slots ──────────────────────────────────────────────────────────────

/// A persisted grid cell. At most one exists per coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealSlot {
  pub slot_id:   i64,
  pub day:       Day,
  pub meal_type: MealType,
}

/// The fact that a recipe occupies a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assignment {
  pub slot_id:   i64,
  pub recipe_id: i64,
}

/// A slot with the recipes assigned to it, sorted by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotDetail {
  pub slot:    MealSlot,
  pub recipes: Vec<Recipe>,
}

/// A slot as read back from storage, before its codes are validated.
///
/// Input to [`crate::grid::build_grid`], which skips rows whose codes are
/// not enumerated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotRow {
  pub slot_id:   i64,
  pub day:       String,
  pub meal_type: String,
  pub recipes:   Vec<Recipe>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn codes_round_trip() {
    for day in Day::ALL {
      assert_eq!(Day::from_code(day.code()), Some(day));
    }
    for meal in MealType::ALL {
      assert_eq!(MealType::from_code(meal.code()), Some(meal));
    }
  }

  #[test]
  fn grid_indices_follow_declaration_order() {
    assert_eq!(Day::Monday.index(), 0);
    assert_eq!(Day::Sunday.index(), 6);
    assert_eq!(MealType::Breakfast.index(), 0);
    assert_eq!(MealType::Snack.index(), 3);
  }

  #[test]
  fn parse_valid_coordinate() {
    let coord = SlotCoordinate::parse("WED", "DIN").unwrap();
    assert_eq!(coord, SlotCoordinate::new(Day::Wednesday, MealType::Dinner));
  }

  #[test]
  fn parse_rejects_unknown_codes() {
    assert!(matches!(
      SlotCoordinate::parse("XYZ", "LUN"),
      Err(Error::InvalidSlotCoordinate { ref day, .. }) if day == "XYZ"
    ));
    assert!(SlotCoordinate::parse("MON", "BRUNCH").is_err());
    // Matching is exact.
    assert!(SlotCoordinate::parse("mon", "lun").is_err());
  }

  #[test]
  fn serde_uses_codes() {
    let json = serde_json::to_string(&MealSlot {
      slot_id:   1,
      day:       Day::Friday,
      meal_type: MealType::Snack,
    })
    .unwrap();
    assert_eq!(json, r#"{"slot_id":1,"day":"FRI","meal_type":"SNK"}"#);
  }
}
