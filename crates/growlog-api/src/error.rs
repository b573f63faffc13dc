//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::{
    multipart::{MultipartError, MultipartRejection},
    rejection::JsonRejection,
  },
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use growlog_core::Error as CoreError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("unauthorized")]
  Unauthorized,

  #[error("forbidden: {0}")]
  Forbidden(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("payload too large: {0}")]
  PayloadTooLarge(String),

  #[error("internal error: {0}")]
  Internal(String),

  #[error(transparent)]
  Core(#[from] CoreError),
}

impl ApiError {
  pub fn bad_request(msg: impl ToString) -> Self { Self::BadRequest(msg.to_string()) }

  /// An extractor rejection; oversized bodies keep their 413.
  fn rejected(status: StatusCode, text: String) -> Self {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
      Self::PayloadTooLarge(text)
    } else {
      Self::BadRequest(text)
    }
  }

  fn status(&self) -> StatusCode {
    match self {
      ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
      ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
      ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
      ApiError::Core(e) => match e {
        CoreError::Validation(_) | CoreError::UnknownFactKind(_) => {
          StatusCode::BAD_REQUEST
        }
        CoreError::OwnerNotFound(_)
        | CoreError::PlantNotFound(_)
        | CoreError::FactNotFound(_) => StatusCode::NOT_FOUND,
        CoreError::Conflict(_) => StatusCode::CONFLICT,
        CoreError::Decode { .. }
        | CoreError::Generation(_)
        | CoreError::Media(_)
        | CoreError::Store(_)
        | CoreError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
      },
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
    }

    let message = match &self {
      ApiError::Core(CoreError::Validation(m)) => m.clone(),
      other => other.to_string(),
    };
    let mut res = (status, Json(json!({ "error": message }))).into_response();

    if matches!(self, ApiError::Unauthorized) {
      res.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Basic realm=\"growlog\""),
      );
    }
    res
  }
}

impl From<JsonRejection> for ApiError {
  fn from(e: JsonRejection) -> Self { Self::rejected(e.status(), e.body_text()) }
}

impl From<MultipartRejection> for ApiError {
  fn from(e: MultipartRejection) -> Self { Self::rejected(e.status(), e.body_text()) }
}

impl From<MultipartError> for ApiError {
  fn from(e: MultipartError) -> Self { Self::rejected(e.status(), e.body_text()) }
}

pub type Result<T, E = ApiError> = std::result::Result<T, E>;
