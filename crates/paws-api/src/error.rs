//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use paws_core::error::Violation;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("validation failed")]
  Validation(Vec<Violation>),

  #[error("not found: {0}")]
  NotFound(String),

  /// A wrapped domain failure. Only its message reaches the client.
  #[error(transparent)]
  Domain(paws_core::Error),
}

impl From<paws_core::Error> for ApiError {
  fn from(e: paws_core::Error) -> Self {
    match e {
      paws_core::Error::Validation(v) => ApiError::Validation(v),
      other => ApiError::Domain(other),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::Validation(violations) => (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "validation failed", "violations": violations })),
      )
        .into_response(),
      ApiError::NotFound(m) => {
        (StatusCode::NOT_FOUND, Json(json!({ "error": m }))).into_response()
      }
      ApiError::Domain(e) => {
        error!(
          error = %e,
          source = ?std::error::Error::source(&e),
          "request failed"
        );
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          Json(json!({ "error": e.to_string() })),
        )
          .into_response()
      }
    }
  }
}
