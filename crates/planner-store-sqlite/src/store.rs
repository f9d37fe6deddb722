//! [`SqliteStore`], the SQLite implementation of [`PlannerStore`].

use std::{collections::BTreeMap, path::Path};

use rusqlite::OptionalExtension as _;

use planner_core::{
  model::{
    Assignment, Ingredient, IngredientAmount, MealSlot, NewIngredient, Recipe,
    RecipeDetail, RecipeDraft, RecipeLine, SlotCoordinate, SlotDetail, SlotRow,
  },
  store::PlannerStore,
};

use crate::{
  encode::{
    RawSlot, RawSlotDetail, ingredient_from_row, line_from_row, recipe_from_row,
  },
  schema::SCHEMA,
  Error, Result,
};

const LINES_SELECT: &str = "
  SELECT ri.recipe_id, ri.ingredient_id, i.name, i.unit, ri.quantity
  FROM recipe_ingredients ri
  JOIN ingredients i ON i.ingredient_id = ri.ingredient_id";

// ─── Connection-level helpers ────────────────────────────────────────────────

/// Read a recipe and its lines. `QueryReturnedNoRows` if the recipe is absent.
fn load_recipe(
  conn: &rusqlite::Connection,
  recipe_id: i64,
) -> rusqlite::Result<RecipeDetail> {
  let recipe = conn.query_row(
    "SELECT recipe_id, name FROM recipes WHERE recipe_id = ?1",
    rusqlite::params![recipe_id],
    recipe_from_row,
  )?;

  let mut stmt = conn.prepare(&format!(
    "{LINES_SELECT} WHERE ri.recipe_id = ?1 ORDER BY i.name"
  ))?;
  let lines = stmt
    .query_map(rusqlite::params![recipe_id], line_from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  Ok(RecipeDetail { recipe, lines })
}

fn insert_lines(
  conn: &rusqlite::Connection,
  recipe_id: i64,
  lines: &[IngredientAmount],
) -> rusqlite::Result<()> {
  let mut stmt = conn.prepare(
    "INSERT INTO recipe_ingredients (recipe_id, ingredient_id, quantity)
     VALUES (?1, ?2, ?3)",
  )?;
  for line in lines {
    stmt.execute(rusqlite::params![recipe_id, line.ingredient_id, line.quantity])?;
  }
  Ok(())
}

/// Read a slot and its assigned recipes (sorted by name).
fn load_slot(
  conn: &rusqlite::Connection,
  slot_id: i64,
) -> rusqlite::Result<Option<RawSlotDetail>> {
  let Some(slot) = conn
    .query_row(
      "SELECT slot_id, day, meal_type FROM meal_slots WHERE slot_id = ?1",
      rusqlite::params![slot_id],
      RawSlot::from_row,
    )
    .optional()?
  else {
    return Ok(None);
  };

  let mut stmt = conn.prepare(
    "SELECT r.recipe_id, r.name
     FROM meal_recipes mr
     JOIN recipes r ON r.recipe_id = mr.recipe_id
     WHERE mr.slot_id = ?1
     ORDER BY r.name",
  )?;
  let recipes = stmt
    .query_map(rusqlite::params![slot_id], recipe_from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  Ok(Some(RawSlotDetail { slot, recipes }))
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A planner store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    tracing::debug!(path = %path.display(), "opened planner database");
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── PlannerStore impl ───────────────────────────────────────────────────────

impl PlannerStore for SqliteStore {
  type Error = Error;

  // ── Ingredients ───────────────────────────────────────────────────────────

  async fn add_ingredient(&self, input: NewIngredient) -> Result<Ingredient> {
    let context = format!("ingredient {:?}", input.name);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO ingredients (name, unit) VALUES (?1, ?2)",
          rusqlite::params![input.name, input.unit],
        )?;
        Ok(Ingredient {
          ingredient_id: conn.last_insert_rowid(),
          name:          input.name,
          unit:          input.unit,
        })
      })
      .await
      .map_err(|e| Error::from_write(e, &context))
  }

  async fn get_ingredient(&self, id: i64) -> Result<Option<Ingredient>> {
    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(
            conn
              .query_row(
                "SELECT ingredient_id, name, unit FROM ingredients
                 WHERE ingredient_id = ?1",
                rusqlite::params![id],
                ingredient_from_row,
              )
              .optional()?,
          )
        })
        .await?,
    )
  }

  async fn list_ingredients(&self) -> Result<Vec<Ingredient>> {
    Ok(
      self
        .conn
        .call(|conn| {
          let mut stmt = conn
            .prepare("SELECT ingredient_id, name, unit FROM ingredients ORDER BY name")?;
          let rows = stmt
            .query_map([], ingredient_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          Ok(rows)
        })
        .await?,
    )
  }

  async fn update_ingredient(
    &self,
    id:    i64,
    input: NewIngredient,
  ) -> Result<Ingredient> {
    let context = format!("ingredient {:?}", input.name);

    let updated = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE ingredients SET name = ?1, unit = ?2 WHERE ingredient_id = ?3",
          rusqlite::params![input.name, input.unit, id],
        )?;
        Ok((changed > 0).then_some(Ingredient {
          ingredient_id: id,
          name:          input.name,
          unit:          input.unit,
        }))
      })
      .await
      .map_err(|e| Error::from_write(e, &context))?;

    updated.ok_or(Error::IngredientNotFound(id))
  }

  async fn delete_ingredient(&self, id: i64) -> Result<bool> {
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM ingredients WHERE ingredient_id = ?1",
          rusqlite::params![id],
        )?)
      })
      .await?;
    Ok(deleted > 0)
  }

  // ── Recipes ───────────────────────────────────────────────────────────────

  async fn add_recipe(&self, draft: RecipeDraft) -> Result<RecipeDetail> {
    let context = format!("recipe {:?}", draft.name);

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO recipes (name) VALUES (?1)",
          rusqlite::params![draft.name],
        )?;
        let recipe_id = tx.last_insert_rowid();
        insert_lines(&tx, recipe_id, &draft.lines)?;
        let detail = load_recipe(&tx, recipe_id)?;
        tx.commit()?;
        Ok(detail)
      })
      .await
      .map_err(|e| Error::from_write(e, &context))
  }

  async fn get_recipe(&self, id: i64) -> Result<Option<RecipeDetail>> {
    Ok(
      self
        .conn
        .call(move |conn| Ok(load_recipe(conn, id).optional()?))
        .await?,
    )
  }

  async fn list_recipes(&self) -> Result<Vec<Recipe>> {
    Ok(
      self
        .conn
        .call(|conn| {
          let mut stmt =
            conn.prepare("SELECT recipe_id, name FROM recipes ORDER BY name")?;
          let rows = stmt
            .query_map([], recipe_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          Ok(rows)
        })
        .await?,
    )
  }

  async fn update_recipe(
    &self,
    id:    i64,
    draft: RecipeDraft,
  ) -> Result<RecipeDetail> {
    let context = format!("recipe {:?}", draft.name);

    let updated = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let changed = tx.execute(
          "UPDATE recipes SET name = ?1 WHERE recipe_id = ?2",
          rusqlite::params![draft.name, id],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        tx.execute(
          "DELETE FROM recipe_ingredients WHERE recipe_id = ?1",
          rusqlite::params![id],
        )?;
        insert_lines(&tx, id, &draft.lines)?;
        let detail = load_recipe(&tx, id)?;
        tx.commit()?;
        Ok(Some(detail))
      })
      .await
      .map_err(|e| Error::from_write(e, &context))?;

    updated.ok_or(Error::RecipeNotFound(id))
  }

  async fn delete_recipe(&self, id: i64) -> Result<bool> {
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM recipes WHERE recipe_id = ?1",
          rusqlite::params![id],
        )?)
      })
      .await?;
    Ok(deleted > 0)
  }

  // ── Slots ─────────────────────────────────────────────────────────────────

  async fn get_or_create_slot(
    &self,
    coord: SlotCoordinate,
  ) -> Result<(MealSlot, bool)> {
    let day  = coord.day.code();
    let meal = coord.meal_type.code();

    let (slot_id, created) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let existing: Option<i64> = tx
          .query_row(
            "SELECT slot_id FROM meal_slots WHERE day = ?1 AND meal_type = ?2",
            rusqlite::params![day, meal],
            |r| r.get(0),
          )
          .optional()?;

        let result = match existing {
          Some(slot_id) => (slot_id, false),
          None => {
            tx.execute(
              "INSERT INTO meal_slots (day, meal_type) VALUES (?1, ?2)",
              rusqlite::params![day, meal],
            )?;
            (tx.last_insert_rowid(), true)
          }
        };
        tx.commit()?;
        Ok(result)
      })
      .await
      .map_err(|e| Error::from_write(e, &format!("meal slot {day} {meal}")))?;

    let slot = MealSlot { slot_id, day: coord.day, meal_type: coord.meal_type };
    Ok((slot, created))
  }

  async fn create_slot(&self, coord: SlotCoordinate) -> Result<MealSlot> {
    let day  = coord.day.code();
    let meal = coord.meal_type.code();

    let slot_id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO meal_slots (day, meal_type) VALUES (?1, ?2)",
          rusqlite::params![day, meal],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await
      .map_err(|e| Error::from_write(e, &format!("meal slot {day} {meal}")))?;

    Ok(MealSlot { slot_id, day: coord.day, meal_type: coord.meal_type })
  }

  async fn get_slot(&self, id: i64) -> Result<Option<SlotDetail>> {
    let raw = self
      .conn
      .call(move |conn| Ok(load_slot(conn, id)?))
      .await?;

    raw.map(RawSlotDetail::into_detail).transpose()
  }

  async fn set_slot_recipes(
    &self,
    slot_id:    i64,
    recipe_ids: &[i64],
  ) -> Result<SlotDetail> {
    let ids = recipe_ids.to_vec();

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let exists = tx
          .query_row(
            "SELECT 1 FROM meal_slots WHERE slot_id = ?1",
            rusqlite::params![slot_id],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if !exists {
          return Ok(None);
        }

        tx.execute(
          "DELETE FROM meal_recipes WHERE slot_id = ?1",
          rusqlite::params![slot_id],
        )?;
        {
          let mut stmt = tx.prepare(
            "INSERT INTO meal_recipes (slot_id, recipe_id) VALUES (?1, ?2)",
          )?;
          for recipe_id in &ids {
            stmt.execute(rusqlite::params![slot_id, recipe_id])?;
          }
        }
        let detail = load_slot(&tx, slot_id)?;
        tx.commit()?;
        Ok(detail)
      })
      .await
      .map_err(|e| Error::from_write(e, &format!("assignment to meal slot {slot_id}")))?;

    raw.ok_or(Error::SlotNotFound(slot_id))?.into_detail()
  }

  async fn list_slot_rows(&self) -> Result<Vec<SlotRow>> {
    type Flat = (i64, String, String, Option<i64>, Option<String>);

    let flat: Vec<Flat> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT s.slot_id, s.day, s.meal_type, r.recipe_id, r.name
           FROM meal_slots s
           LEFT JOIN meal_recipes mr ON mr.slot_id = s.slot_id
           LEFT JOIN recipes r      ON r.recipe_id = mr.recipe_id
           ORDER BY s.slot_id, r.name",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
          })?
          .collect::<rusqlite::Result<Vec<Flat>>>()?;
        Ok(rows)
      })
      .await?;

    let mut slots: BTreeMap<i64, SlotRow> = BTreeMap::new();
    for (slot_id, day, meal_type, recipe_id, name) in flat {
      let slot = slots.entry(slot_id).or_insert_with(|| SlotRow {
        slot_id,
        day,
        meal_type,
        recipes: Vec::new(),
      });
      if let (Some(recipe_id), Some(name)) = (recipe_id, name) {
        slot.recipes.push(Recipe { recipe_id, name });
      }
    }

    Ok(slots.into_values().collect())
  }

  async fn reset_plan(&self) -> Result<usize> {
    Ok(
      self
        .conn
        .call(|conn| Ok(conn.execute("DELETE FROM meal_slots", [])?))
        .await?,
    )
  }

  // ── Aggregation reads ─────────────────────────────────────────────────────

  async fn list_assignments(&self) -> Result<Vec<Assignment>> {
    Ok(
      self
        .conn
        .call(|conn| {
          let mut stmt = conn.prepare(
            "SELECT slot_id, recipe_id FROM meal_recipes ORDER BY slot_id, recipe_id",
          )?;
          let rows = stmt
            .query_map([], |row| {
              Ok(Assignment { slot_id: row.get(0)?, recipe_id: row.get(1)? })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          Ok(rows)
        })
        .await?,
    )
  }

  async fn recipe_lines(&self, recipe_ids: &[i64]) -> Result<Vec<RecipeLine>> {
    if recipe_ids.is_empty() {
      return Ok(Vec::new());
    }
    let ids = recipe_ids.to_vec();

    Ok(
      self
        .conn
        .call(move |conn| {
          let placeholders = vec!["?"; ids.len()].join(", ");
          let mut stmt = conn.prepare(&format!(
            "{LINES_SELECT}
             WHERE ri.recipe_id IN ({placeholders})
             ORDER BY ri.recipe_id, i.name"
          ))?;
          let rows = stmt
            .query_map(rusqlite::params_from_iter(ids.iter()), line_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          Ok(rows)
        })
        .await?,
    )
  }
}
