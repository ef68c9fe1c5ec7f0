//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every failure leaves as `{"error": "<message>"}`; validation failures also
//! carry a `"fields"` array. Unexpected failures are logged here and answered
//! with a generic message so backend details never reach the client.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use phreg_core::Error as CoreError;
use serde_json::json;
use thiserror::Error;

pub const OVERLOADED_MESSAGE: &str =
  "the registration service is handling too many requests; please try again in a moment";

const INTERNAL_MESSAGE: &str = "internal server error";

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// The request carried neither the identity header nor the session cookie.
  #[error("missing caller identity")]
  MissingIdentity,

  #[error(transparent)]
  Core(#[from] CoreError),
}

impl ApiError {
  fn status(&self) -> StatusCode {
    match self {
      ApiError::MissingIdentity => StatusCode::BAD_REQUEST,
      ApiError::Core(e) => match e {
        CoreError::InvalidState { .. }
        | CoreError::UnknownIdentity(_)
        | CoreError::Validation(_)
        | CoreError::StatusNotSettable(_)
        | CoreError::UnknownStatus(_) => StatusCode::BAD_REQUEST,
        CoreError::Forbidden(_) => StatusCode::FORBIDDEN,
        CoreError::NotFound(_) | CoreError::NoSuchEmail(_) => StatusCode::NOT_FOUND,
        CoreError::Conflict(_) => StatusCode::CONFLICT,
        CoreError::Overloaded(_) => StatusCode::BAD_GATEWAY,
        CoreError::Store(_) | CoreError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
      },
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();

    let body = match &self {
      ApiError::Core(CoreError::Validation(fields)) => {
        json!({ "error": "profile failed validation", "fields": fields })
      }
      ApiError::Core(CoreError::Forbidden(reason)) => json!({ "error": reason }),
      ApiError::Core(CoreError::Overloaded(e)) => {
        tracing::warn!(error = %e, "store overloaded");
        json!({ "error": OVERLOADED_MESSAGE })
      }
      _ if status == StatusCode::INTERNAL_SERVER_ERROR => {
        tracing::error!(error = %self, "request failed");
        json!({ "error": INTERNAL_MESSAGE })
      }
      other => json!({ "error": other.to_string() }),
    };

    (status, Json(body)).into_response()
  }
}
