//! HTTP error type and [`axum::response::IntoResponse`] implementation.
//!
//! Resolution failures are logged in full and reported to the client only as
//! a generic "service unavailable".

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use nimbus_core::validate::Problems;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("resolution failed: {0}")]
  Resolve(#[from] nimbus_core::Error),

  #[error("not found")]
  NotFound,

  #[error("invalid drawing: {0}")]
  InvalidDrawing(Problems),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub const UNAVAILABLE_MESSAGE: &str = "weather is unavailable right now, try again later";

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    match self {
      Error::Resolve(e) => {
        tracing::error!(error = %e, "request resolution failed");
        (
          StatusCode::SERVICE_UNAVAILABLE,
          Json(json!({ "error": UNAVAILABLE_MESSAGE })),
        )
          .into_response()
      }
      Error::NotFound => {
        (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" }))).into_response()
      }
      Error::InvalidDrawing(problems) => (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "invalid drawing", "problems": problems })),
      )
        .into_response(),
      Error::Store(e) => {
        tracing::error!(error = %e, "store error");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          Json(json!({ "error": "internal error" })),
        )
          .into_response()
      }
    }
  }
}
