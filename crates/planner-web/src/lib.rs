//! HTTP front end for the weekly meal planner.
//!
//! Exposes an axum [`Router`] backed by any [`planner_core::store::PlannerStore`].
//! Pages are served as JSON; forms are posted `application/x-www-form-urlencoded`
//! and answer a successful save with a `303 See Other` redirect.

pub mod error;
pub mod ingredients;
pub mod plan;
pub mod recipes;
pub mod shopping;
pub mod slots;

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::{
  Router,
  routing::{get, post},
};
use planner_core::store::PlannerStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

pub use error::ApiError;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `planner.toml` and
/// `PLANNER_*` environment variables.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
  pub host:          String,
  pub port:          u16,
  pub database_path: PathBuf,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:          "127.0.0.1".to_string(),
      port:          8000,
      database_path: PathBuf::from("planner.sqlite3"),
    }
  }
}

impl ServerConfig {
  /// Layer the optional file at `path` and the environment over the defaults.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path.to_path_buf()).required(false))
      .add_source(config::Environment::with_prefix("PLANNER"))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the application router for `store`.
pub fn router<S>(store: Arc<S>) -> Router
where
  S: PlannerStore + 'static,
{
  Router::new()
    // Plan
    .route("/", get(plan::index::<S>))
    .route("/reset/", post(plan::reset::<S>))
    .route("/shopping-list/", get(shopping::handler::<S>))
    // Recipes
    .route("/recipes/", get(recipes::list::<S>))
    .route("/recipe/new/", get(recipes::new_form::<S>).post(recipes::create::<S>))
    .route("/recipe/{id}/", get(recipes::edit_form::<S>).post(recipes::update::<S>))
    .route("/recipe/{id}/delete/", post(recipes::delete::<S>))
    // Ingredients
    .route(
      "/ingredient/new/",
      get(ingredients::new_form::<S>).post(ingredients::create::<S>),
    )
    .route(
      "/ingredient/{id}/",
      get(ingredients::edit_form::<S>).post(ingredients::update::<S>),
    )
    .route("/ingredient/{id}/delete/", post(ingredients::delete::<S>))
    // Meal slots
    .route(
      "/meal-slot/create/{day}/{meal_type}/",
      get(slots::create_form::<S>).post(slots::create::<S>),
    )
    .route(
      "/meal-slot/update/{id}/",
      get(slots::update_form::<S>).post(slots::update::<S>),
    )
    .layer(TraceLayer::new_for_http())
    .with_state(store)
}
