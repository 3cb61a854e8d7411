use axum::extract::FromRequest;

use crate::error::AppError;

/// `Json` whose rejections come back in the standard error envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);
