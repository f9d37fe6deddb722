//! SQL schema for the planner SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS ingredients (
    ingredient_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name          TEXT NOT NULL UNIQUE,  -- case-sensitive
    unit          TEXT NOT NULL          -- free text: 'g', 'ml', 'pezzi'
);

CREATE TABLE IF NOT EXISTS recipes (
    recipe_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name      TEXT NOT NULL UNIQUE
);

-- One row per (recipe, ingredient).
CREATE TABLE IF NOT EXISTS recipe_ingredients (
    recipe_id     INTEGER NOT NULL
                  REFERENCES recipes(recipe_id) ON DELETE CASCADE,
    ingredient_id INTEGER NOT NULL
                  REFERENCES ingredients(ingredient_id) ON DELETE CASCADE,
    quantity      REAL NOT NULL,
    PRIMARY KEY (recipe_id, ingredient_id)
);

-- One row per (day, meal_type) grid cell.
CREATE TABLE IF NOT EXISTS meal_slots (
    slot_id   INTEGER PRIMARY KEY AUTOINCREMENT,
    day       TEXT NOT NULL,   -- 'MON' .. 'SUN'
    meal_type TEXT NOT NULL,   -- 'BRK' | 'LUN' | 'DIN' | 'SNK'
    UNIQUE (day, meal_type)
);

-- A recipe may sit in many slots, but only once per slot.
CREATE TABLE IF NOT EXISTS meal_recipes (
    slot_id   INTEGER NOT NULL
              REFERENCES meal_slots(slot_id) ON DELETE CASCADE,
    recipe_id INTEGER NOT NULL
              REFERENCES recipes(recipe_id) ON DELETE CASCADE,
    PRIMARY KEY (slot_id, recipe_id)
);

CREATE INDEX IF NOT EXISTS recipe_ingredients_ingredient_idx
    ON recipe_ingredients(ingredient_id);
CREATE INDEX IF NOT EXISTS meal_recipes_recipe_idx
    ON meal_recipes(recipe_id);

PRAGMA user_version = 1;
";
