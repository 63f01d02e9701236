//! Error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::error::ApiError;

/// Error body; `required` is only present for missing profile data
#[derive(Debug, Serialize)]
struct ErrorResponse {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    required: Option<Vec<&'static str>>,
}

/// HTTP error wrapper that implements `IntoResponse`
#[derive(Debug)]
pub struct HttpError {
    pub status: StatusCode,
    pub message: String,
    pub required: Option<Vec<&'static str>>,
}

impl HttpError {
    fn new(status: StatusCode, message: String) -> Self {
        Self {
            status,
            message,
            required: None,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            message: self.message,
            required: self.required,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::BadRequest(message) => Self::new(StatusCode::BAD_REQUEST, message),
            ApiError::Unauthorized(message) => Self::new(StatusCode::UNAUTHORIZED, message),
            ApiError::NotFound(message) => Self::new(StatusCode::NOT_FOUND, message),
            ApiError::MissingProfileData { ref required } => Self {
                status: StatusCode::BAD_REQUEST,
                message: err.to_string(),
                required: Some(required.clone()),
            },
            ApiError::InvalidProfile(_) => Self::new(StatusCode::BAD_REQUEST, err.to_string()),
            ApiError::Database(_) | ApiError::Ai { .. } | ApiError::Password(_) | ApiError::Task(_) => {
                tracing::error!(error = %err, "Request failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::AiError;
    use crate::db::DbError;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::BadRequest("bad".into()), StatusCode::BAD_REQUEST),
            (ApiError::Unauthorized("no".into()), StatusCode::UNAUTHORIZED),
            (ApiError::not_found("Workout"), StatusCode::NOT_FOUND),
            (ApiError::Database(DbError::NotInitialized), StatusCode::INTERNAL_SERVER_ERROR),
            (
                ApiError::ai("Failed to analyze progress")(AiError::NotConfigured),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            let http: HttpError = err.into();
            assert_eq!(http.status, status);
            assert!(http.required.is_none());
        }
    }

    #[test]
    fn test_missing_profile_data_lists_fields() {
        let http: HttpError = ApiError::MissingProfileData {
            required: vec!["weight", "height", "age"],
        }
        .into();
        assert_eq!(http.status, StatusCode::BAD_REQUEST);
        assert_eq!(http.required, Some(vec!["weight", "height", "age"]));
        assert_eq!(http.message, "Missing required data for body metrics calculation");
    }
}
