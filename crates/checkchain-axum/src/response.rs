// ./crates/checkchain-axum/src/response.rs
// Client-facing rejection for failed validation
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use checkchain::ValidationFailure;
use serde::Serialize;

/// A 400 Bad Request carrying one client-safe message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRejection {
    message: String,
}

impl ValidationRejection {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The request body could not be parsed into field values
    pub fn invalid_body() -> Self {
        Self::new("invalid request body")
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ValidationRejection {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(ErrorBody {
            error: self.message,
        });

        (status, body).into_response()
    }
}

impl From<ValidationFailure> for ValidationRejection {
    fn from(failure: ValidationFailure) -> Self {
        ValidationRejection::new(failure.message())
    }
}

impl std::fmt::Display for ValidationRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rejection_response() {
        let rejection = ValidationRejection::from(ValidationFailure::failed("b", "invalid value for b"));
        let response = rejection.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, serde_json::json!({ "error": "invalid value for b" }));
    }
}
