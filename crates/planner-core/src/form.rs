//! Validation of submitted forms.
//!
//! Forms arrive as the ordered key/value pairs of an urlencoded body. Parsing
//! never touches storage: choice fields are checked against id lists the
//! caller loaded beforehand. A failed parse returns every problem found as
//! [`FieldErrors`], keyed by form field name.
//!
//! Recipe ingredient rows use an indexed formset layout:
//!
//! ```text
//! name=Pasta
//! lines-0-ingredient=3   lines-0-quantity=200
//! lines-1-ingredient=4   lines-1-quantity=2    lines-1-delete=on
//! ```

use std::{collections::BTreeMap, fmt};

use serde::Serialize;

use crate::model::{IngredientAmount, NewIngredient, RecipeDraft};

/// Submitted form body.
pub type FormData = [(String, String)];

pub const INGREDIENT_NAME_MAX: usize = 100;
pub const UNIT_MAX: usize = 50;
pub const RECIPE_NAME_MAX: usize = 200;

const REQUIRED: &str = "This field is required.";
const INVALID_CHOICE: &str =
  "Select a valid choice. That choice is not one of the available choices.";

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Field name → message. Serialises as a flat JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
  pub fn new() -> Self { Self::default() }

  /// Record `message` against `field`. The first message per field is kept.
  pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
    self.0.entry(field.into()).or_insert_with(|| message.into());
  }

  pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
    let mut errors = Self::new();
    errors.add(field, message);
    errors
  }

  pub fn get(&self, field: &str) -> Option<&str> {
    self.0.get(field).map(String::as_str)
  }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn len(&self) -> usize { self.0.len() }

  fn finish<T>(self, value: T) -> Result<T, FieldErrors> {
    if self.is_empty() { Ok(value) } else { Err(self) }
  }
}

impl fmt::Display for FieldErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut first = true;
    for (field, message) in &self.0 {
      if !first {
        f.write_str("; ")?;
      }
      write!(f, "{field}: {message}")?;
      first = false;
    }
    Ok(())
  }
}

impl std::error::Error for FieldErrors {}

// ─── Field helpers ───────────────────────────────────────────────────────────

fn first<'a>(data: &'a FormData, key: &str) -> Option<&'a str> {
  data.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
}

/// A trimmed, non-empty text field of at most `max` characters.
fn required_text(
  data: &FormData,
  field: &str,
  max: usize,
  errors: &mut FieldErrors,
) -> String {
  let value = first(data, field).unwrap_or_default().trim();
  let len = value.chars().count();
  if value.is_empty() {
    errors.add(field, REQUIRED);
  } else if len > max {
    errors.add(
      field,
      format!("Ensure this value has at most {max} characters (it has {len})."),
    );
  }
  value.to_owned()
}

fn is_checked(value: &str) -> bool {
  !matches!(value.trim().to_ascii_lowercase().as_str(), "" | "0" | "false" | "off")
}

// ─── Ingredient form ─────────────────────────────────────────────────────────

/// Fields: `name`, `unit`.
pub fn parse_ingredient_form(data: &FormData) -> Result<NewIngredient, FieldErrors> {
  let mut errors = FieldErrors::new();
  let name = required_text(data, "name", INGREDIENT_NAME_MAX, &mut errors);
  let unit = required_text(data, "unit", UNIT_MAX, &mut errors);
  errors.finish(NewIngredient { name, unit })
}

// ─── Recipe form ─────────────────────────────────────────────────────────────

#[derive(Default)]
struct LineFields<'a> {
  ingredient: &'a str,
  quantity:   &'a str,
  delete:     bool,
}

/// Fields: `name` plus the `lines-<n>-*` formset.
///
/// Rows left entirely blank, and rows flagged with `lines-<n>-delete`, are
/// dropped. `ingredient_ids` lists the ingredients that may be chosen.
pub fn parse_recipe_form(
  data: &FormData,
  ingredient_ids: &[i64],
) -> Result<RecipeDraft, FieldErrors> {
  let mut errors = FieldErrors::new();
  let name = required_text(data, "name", RECIPE_NAME_MAX, &mut errors);

  let mut rows: BTreeMap<usize, LineFields<'_>> = BTreeMap::new();
  for (key, value) in data {
    let Some((index, field)) = key
      .strip_prefix("lines-")
      .and_then(|rest| rest.split_once('-'))
    else {
      continue;
    };
    let Ok(index) = index.parse::<usize>() else {
      continue;
    };
    let row = rows.entry(index).or_default();
    match field {
      "ingredient" => row.ingredient = value.trim(),
      "quantity" => row.quantity = value.trim(),
      "delete" => row.delete = is_checked(value),
      _ => {}
    }
  }

  let mut lines: Vec<IngredientAmount> = Vec::new();
  for (index, row) in rows {
    if row.delete || (row.ingredient.is_empty() && row.quantity.is_empty()) {
      continue;
    }
    let ingredient_field = format!("lines-{index}-ingredient");
    let quantity_field = format!("lines-{index}-quantity");

    let ingredient_id = if row.ingredient.is_empty() {
      errors.add(&ingredient_field, REQUIRED);
      None
    } else {
      match row.ingredient.parse::<i64>() {
        Ok(id) if ingredient_ids.contains(&id) => Some(id),
        _ => {
          errors.add(&ingredient_field, INVALID_CHOICE);
          None
        }
      }
    };

    let quantity = if row.quantity.is_empty() {
      errors.add(&quantity_field, REQUIRED);
      None
    } else {
      match row.quantity.parse::<f64>() {
        Ok(q) if !q.is_finite() => {
          errors.add(&quantity_field, "Enter a number.");
          None
        }
        Ok(q) if q <= 0.0 => {
          errors.add(&quantity_field, "Ensure this value is greater than 0.");
          None
        }
        Ok(q) => Some(q),
        Err(_) => {
          errors.add(&quantity_field, "Enter a number.");
          None
        }
      }
    };

    if let Some(id) = ingredient_id
      && lines.iter().any(|l| l.ingredient_id == id)
    {
      errors.add(&ingredient_field, "This ingredient is already listed in the recipe.");
      continue;
    }

    if let (Some(ingredient_id), Some(quantity)) = (ingredient_id, quantity) {
      lines.push(IngredientAmount { ingredient_id, quantity });
    }
  }

  errors.finish(RecipeDraft { name, lines })
}

// ─── Slot form ───────────────────────────────────────────────────────────────

/// Fields: repeated `recipes=<id>`. Returns the chosen recipe ids in
/// submission order. `recipe_ids` lists the recipes that may be chosen.
pub fn parse_slot_form(
  data: &FormData,
  recipe_ids: &[i64],
) -> Result<Vec<i64>, FieldErrors> {
  let mut errors = FieldErrors::new();
  let mut chosen: Vec<i64> = Vec::new();

  for (_, value) in data.iter().filter(|(k, _)| k == "recipes") {
    let value = value.trim();
    if value.is_empty() {
      continue;
    }
    match value.parse::<i64>() {
      Ok(id) if !recipe_ids.contains(&id) => errors.add("recipes", INVALID_CHOICE),
      Ok(id) if chosen.contains(&id) => {
        errors.add("recipes", "A recipe can only be assigned once per meal.");
      }
      Ok(id) => chosen.push(id),
      Err(_) => errors.add("recipes", format!("\u{201c}{value}\u{201d} is not a valid value.")),
    }
  }

  errors.finish(chosen)
}
