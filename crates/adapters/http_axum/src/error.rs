//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use georeg_domain::error::{GeoRegError, RegistrationError};

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`GeoRegError`] to an HTTP response with appropriate status code.
pub struct ApiError(GeoRegError);

impl From<GeoRegError> for ApiError {
    fn from(err: GeoRegError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            GeoRegError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            GeoRegError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
            GeoRegError::Registration(err @ RegistrationError::DuplicateService { .. }) => {
                (StatusCode::CONFLICT, err.to_string())
            }
            GeoRegError::Registration(err) => (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
            GeoRegError::Unauthorized => (StatusCode::UNAUTHORIZED, self.0.to_string()),
            GeoRegError::Storage(err) => {
                tracing::error!(error = %err, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
