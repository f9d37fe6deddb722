//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use planner_core::{form::FieldErrors, store::StoreError};
use serde_json::json;
use thiserror::Error;

/// An error returned by a handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  /// A submitted form did not validate; nothing was written.
  #[error("validation failed: {0}")]
  Validation(FieldErrors),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Map a store failure: unknown rows become 404, anything else 500.
  pub fn store<E: StoreError>(err: E) -> Self {
    if err.is_not_found() {
      ApiError::NotFound(err.to_string())
    } else {
      ApiError::Store(Box::new(err))
    }
  }

  /// Like [`ApiError::store`], but a uniqueness conflict is reported against
  /// form field `field`.
  pub fn conflict_on<E: StoreError>(err: E, field: &str, message: &str) -> Self {
    if err.is_conflict() {
      ApiError::Validation(FieldErrors::single(field, message))
    } else {
      ApiError::store(err)
    }
  }
}

impl From<planner_core::Error> for ApiError {
  fn from(err: planner_core::Error) -> Self { ApiError::BadRequest(err.to_string()) }
}

impl From<FieldErrors> for ApiError {
  fn from(errors: FieldErrors) -> Self { ApiError::Validation(errors) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::NotFound(m) => {
        (StatusCode::NOT_FOUND, Json(json!({ "error": m }))).into_response()
      }
      ApiError::BadRequest(m) => {
        (StatusCode::BAD_REQUEST, Json(json!({ "error": m }))).into_response()
      }
      ApiError::Validation(fields) => (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "error": "validation failed", "fields": fields })),
      )
        .into_response(),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() })))
          .into_response()
      }
    }
  }
}
