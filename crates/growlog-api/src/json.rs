//! JSON request bodies whose rejections use the API's error shape.

use axum::extract::FromRequest;

use crate::error::ApiError;

/// [`axum::Json`] for request bodies. A malformed or mistyped body is
/// answered with `{"error": ...}` instead of axum's plain-text rejection.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);
