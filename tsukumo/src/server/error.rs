//! Error responses for the repository service.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use crate::manager::ManagerError;

/// Message returned when an upload has a disallowed extension.
pub const INVALID_FORMAT_MESSAGE: &str =
    "Invalid file format. Only .tar and .tar.gz files are allowed.";

/// An API failure rendered as `{"error": ...}` with a matching status code.
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request.
    BadRequest(String),
    /// 404 Not Found.
    NotFound(String),
    /// 500 Internal Server Error.
    Internal(String),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message placed in the response body.
    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest(msg) | Self::NotFound(msg) | Self::Internal(msg) => msg,
        }
    }

    pub(crate) fn package_not_found() -> Self {
        Self::NotFound("Package not found".to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.status().as_u16(), self.message())
    }
}

impl std::error::Error for ApiError {}

impl From<ManagerError> for ApiError {
    fn from(e: ManagerError) -> Self {
        match e {
            ManagerError::PackageNotFound { .. } => Self::package_not_found(),
            ManagerError::InvalidExtension { .. } => {
                Self::BadRequest(INVALID_FORMAT_MESSAGE.to_string())
            }
            ManagerError::InvalidPath(path) => {
                Self::BadRequest(format!("Invalid filename: {}", path))
            }
            other => {
                error!(error = %other, "Repository operation failed");
                Self::Internal(other.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.message() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_manager_error_mapping() {
        let not_found: ApiError = ManagerError::PackageNotFound {
            name: "x".to_string(),
        }
        .into();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
        assert_eq!(not_found.message(), "Package not found");

        let invalid: ApiError = ManagerError::InvalidExtension {
            filename: "x.zip".to_string(),
        }
        .into();
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
        assert_eq!(invalid.message(), INVALID_FORMAT_MESSAGE);

        let io: ApiError = ManagerError::StoreWriteFailed {
            path: PathBuf::from("/store/x"),
            source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        }
        .into();
        assert_eq!(io.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_into_response_status() {
        let response = ApiError::BadRequest("No file provided".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
