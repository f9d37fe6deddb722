//! Row types and decoding helpers between SQLite columns and domain types.
//!
//! Day and meal codes are stored as their three-letter strings and validated
//! on the way out. Row readers are plain functions over `&rusqlite::Row` so
//! they can be shared by every query selecting the same columns.

use planner_core::model::{
  Ingredient, MealSlot, Recipe, RecipeLine, SlotCoordinate, SlotDetail,
};

use crate::Result;

// ─── Row readers ─────────────────────────────────────────────────────────────

/// `ingredient_id, name, unit`
pub fn ingredient_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Ingredient> {
  Ok(Ingredient {
    ingredient_id: row.get(0)?,
    name:          row.get(1)?,
    unit:          row.get(2)?,
  })
}

/// `recipe_id, name`
pub fn recipe_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Recipe> {
  Ok(Recipe { recipe_id: row.get(0)?, name: row.get(1)? })
}

/// `recipe_id, ingredient_id, ingredient name, unit, quantity`
pub fn line_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RecipeLine> {
  Ok(RecipeLine {
    recipe_id:       row.get(0)?,
    ingredient_id:   row.get(1)?,
    ingredient_name: row.get(2)?,
    unit:            row.get(3)?,
    quantity:        row.get(4)?,
  })
}

// ─── Slots ───────────────────────────────────────────────────────────────────

/// Raw columns read from a `meal_slots` row.
pub struct RawSlot {
  pub slot_id:   i64,
  pub day:       String,
  pub meal_type: String,
}

impl RawSlot {
  /// `slot_id, day, meal_type`
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      slot_id:   row.get(0)?,
      day:       row.get(1)?,
      meal_type: row.get(2)?,
    })
  }

  pub fn into_slot(self) -> Result<MealSlot> {
    let coord = SlotCoordinate::parse(&self.day, &self.meal_type)?;
    Ok(MealSlot {
      slot_id:   self.slot_id,
      day:       coord.day,
      meal_type: coord.meal_type,
    })
  }
}

/// A slot row plus its assigned recipes, as read inside one connection call.
pub struct RawSlotDetail {
  pub slot:    RawSlot,
  pub recipes: Vec<Recipe>,
}

impl RawSlotDetail {
  pub fn into_detail(self) -> Result<SlotDetail> {
    Ok(SlotDetail { slot: self.slot.into_slot()?, recipes: self.recipes })
  }
}
