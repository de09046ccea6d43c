use axum::extract::FromRequest;

use crate::error::AppError;

/// `Json` body extractor whose rejections use the [`AppError`] envelope (400)
/// instead of axum's plain-text 415/422 responses.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
