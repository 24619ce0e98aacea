use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

/// Infrastructure faults surface as a 500; everything in the spec'd
/// failure taxonomy is handled before reaching this type.
pub struct ApiError(anyhow::Error);

pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("request failed: {:#}", self.0);
        (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
    }
}

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(e: E) -> Self {
        ApiError(e.into())
    }
}
