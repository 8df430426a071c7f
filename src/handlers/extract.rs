use axum::extract::FromRequest;

use crate::errors::AppError;

/// `axum::Json` whose rejections surface as `AppError::Validation`, so bad
/// bodies get the same `{"error": ...}` shape as every other failure.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
