//! `GET /shopping-list/`: the aggregated list for everything planned.

use std::sync::Arc;

use axum::{Json, extract::State};
use planner_core::{
  shopping::{ShoppingItem, shopping_list},
  store::PlannerStore,
};
use serde::Serialize;

use crate::error::ApiError;

pub const TITLE: &str = "Lista della spesa";

#[derive(Debug, Serialize)]
pub struct ShoppingListView {
  pub title: &'static str,
  pub items: Vec<ShoppingItem>,
}

/// `GET /shopping-list/`
pub async fn handler<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<ShoppingListView>, ApiError>
where
  S: PlannerStore,
{
  let items = shopping_list(&*store).await.map_err(ApiError::store)?;
  Ok(Json(ShoppingListView { title: TITLE, items }))
}
