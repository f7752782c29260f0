use std::borrow::Cow;

use allersafe_core::domain::{
    common::entities::app_errors::CoreError, ingredient_analysis::entities::Verdict,
};
use axum::{
    Json,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    ServiceUnavailable(String),
    #[error("{0}")]
    InternalServerError(String),
    /// The analysis could not be produced at all; answered with an UNKNOWN verdict.
    #[error("{0}")]
    AnalysisFailed(String),
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    pub error: String,
    pub code: String,
    pub status: u16,
}

const ANALYSIS_FAILED_SUMMARY: &str =
    "We could not analyze these ingredients right now. Please try again later.";

impl ApiError {
    /// Validation and identity problems keep their status; anything else becomes
    /// [`ApiError::AnalysisFailed`].
    pub fn from_analysis_error(err: CoreError) -> Self {
        match err {
            CoreError::Invalid(_) | CoreError::Unauthorized => ApiError::from(err),
            other => ApiError::AnalysisFailed(other.to_string()),
        }
    }

    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, "E_BAD_REQUEST", message.clone())
            }
            ApiError::Unauthorized(_) => (
                StatusCode::UNAUTHORIZED,
                "E_UNAUTHORIZED",
                "Unauthorized".to_string(),
            ),
            ApiError::NotFound(message) => {
                (StatusCode::NOT_FOUND, "E_NOT_FOUND", message.clone())
            }
            ApiError::ServiceUnavailable(message) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "E_SERVICE_UNAVAILABLE",
                message.clone(),
            ),
            ApiError::InternalServerError(_) | ApiError::AnalysisFailed(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "E_INTERNAL_SERVER_ERROR",
                "Internal server error".to_string(),
            ),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Invalid(message) => ApiError::BadRequest(message),
            CoreError::Unauthorized => ApiError::Unauthorized("Unauthorized".to_string()),
            CoreError::NotFound => ApiError::NotFound("Resource not found".to_string()),
            CoreError::Timeout => ApiError::InternalServerError("Operation timed out".to_string()),
            CoreError::ExternalServiceError(message) => ApiError::InternalServerError(message),
            CoreError::InternalServerError => {
                ApiError::InternalServerError("Internal server error".to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        match self {
            ApiError::AnalysisFailed(reason) => {
                error!("Ingredient analysis failed: {}", reason);
                (status, Json(Verdict::unknown(ANALYSIS_FAILED_SUMMARY))).into_response()
            }
            ApiError::InternalServerError(reason) => {
                error!("Internal server error: {}", reason);
                (status, Json(error_body(status, code, message))).into_response()
            }
            _ => (status, Json(error_body(status, code, message))).into_response(),
        }
    }
}

fn error_body(status: StatusCode, code: &str, message: String) -> ApiErrorResponse {
    ApiErrorResponse {
        error: message,
        code: code.to_string(),
        status: status.as_u16(),
    }
}

fn validation_message(errors: &ValidationErrors) -> String {
    let messages: Vec<Cow<'static, str>> = errors
        .field_errors()
        .into_values()
        .flat_map(|field| field.iter())
        .filter_map(|e| e.message.clone())
        .collect();

    if messages.is_empty() {
        errors.to_string()
    } else {
        messages.join("; ")
    }
}

/// JSON body extractor that runs `validator` rules and rejects with a 400 [`ApiError`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidateJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidateJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

        value
            .validate()
            .map_err(|errors| ApiError::BadRequest(validation_message(&errors)))?;

        Ok(ValidateJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_map_to_statuses() {
        assert_eq!(
            ApiError::from(CoreError::Invalid("bad".to_string())).parts().0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(CoreError::NotFound).parts().0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(CoreError::Timeout).parts().0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_analysis_errors_keep_validation_status() {
        assert_eq!(
            ApiError::from_analysis_error(CoreError::Invalid("empty".to_string())),
            ApiError::BadRequest("empty".to_string())
        );
        assert!(matches!(
            ApiError::from_analysis_error(CoreError::Timeout),
            ApiError::AnalysisFailed(_)
        ));
    }

    #[test]
    fn test_unauthorized_body_is_generic() {
        let (status, code, message) =
            ApiError::Unauthorized("Missing X-User-Id header".to_string()).parts();

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(code, "E_UNAUTHORIZED");
        assert_eq!(message, "Unauthorized");
    }
}
