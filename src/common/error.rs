use crate::utils::time_parser::TimeFormatError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum ApiError {
    /// A required path segment is absent or empty.
    MissingInput(&'static str),
    InvalidTimeFormat(TimeFormatError),
    ResourceNotFound,
    /// A storage call failed after startup; only the current request is affected.
    Internal(anyhow::Error),
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::MissingInput(field) => {
                write!(f, "Required path segment '{field}' is missing.")
            }
            ApiError::InvalidTimeFormat(err) => write!(f, "{err}"),
            ApiError::ResourceNotFound => f.write_str("The requested resource could not be found."),
            ApiError::Internal(_) => {
                write!(f, "An internal error occurred. Please try again later.")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let status = match &self {
            ApiError::MissingInput(_) | ApiError::InvalidTimeFormat(_) => {
                tracing::warn!("{}", message);
                StatusCode::BAD_REQUEST
            }
            ApiError::ResourceNotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(err) => {
                tracing::error!("{:?}", self);
                err.chain()
                    .skip(1)
                    .for_each(|cause| tracing::error!("Because: {}", cause));
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, message).into_response()
    }
}

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(value: E) -> Self {
        Self::Internal(value.into())
    }
}
