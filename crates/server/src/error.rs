use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use database::error::ServiceError;
use log::{error, warn};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Service(#[from] ServiceError),
    /// A lookup by natural key found nothing
    #[error("{0} not found")]
    NotFound(String),
}

/// Body of every error response
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ApiError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    fn parts(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Service(err) => match err {
                ServiceError::MissingField(_) => (StatusCode::BAD_REQUEST, "MISSING_FIELD"),
                ServiceError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION"),
                ServiceError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                ServiceError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
                ServiceError::Dependency(_) => (StatusCode::CONFLICT, "DEPENDENCY"),
                ServiceError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE"),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = self.parts();

        let message = if status.is_server_error() {
            error!("request failed: {self}");
            "an unexpected database error occurred".to_owned()
        } else {
            warn!("request rejected ({kind}): {self}");
            self.to_string()
        };

        let body = Json(ErrorResponse {
            error: kind.to_owned(),
            message,
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::DbErr;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ServiceError::MissingField("designationFr"), StatusCode::BAD_REQUEST),
            (ServiceError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (ServiceError::not_found("provider", 1), StatusCode::NOT_FOUND),
            (ServiceError::Conflict("dup".into()), StatusCode::CONFLICT),
            (ServiceError::Dependency("used".into()), StatusCode::CONFLICT),
            (
                ServiceError::Database(DbErr::Custom("boom".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), expected);
        }
        assert_eq!(
            ApiError::not_found("award method 'AOO'").into_response().status(),
            StatusCode::NOT_FOUND
        );
    }
}
