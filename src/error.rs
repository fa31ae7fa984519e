use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

/// Closed set of error kinds surfaced to the routing layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Unauthenticated,
    Forbidden,
    NotFound,
    Conflict,
    ValidationError,
    Infra,
}

impl ErrorKind {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorKind::Unauthenticated => StatusCode::UNAUTHORIZED,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::ValidationError => StatusCode::BAD_REQUEST,
            ErrorKind::Infra => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Unauthenticated => "AUTHENTICATION_ERROR",
            ErrorKind::Forbidden => "AUTHORIZATION_ERROR",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Conflict => "CONFLICT_ERROR",
            ErrorKind::ValidationError => "VALIDATION_ERROR",
            ErrorKind::Infra => "INTERNAL_ERROR",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Authentication error: {0}")]
    Unauthenticated(String),

    #[error("Authorization error: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict error: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("Token signing error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn unauthenticated<T: Into<String>>(msg: T) -> Self {
        Self::Unauthenticated(msg.into())
    }

    pub fn forbidden<T: Into<String>>(msg: T) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict<T: Into<String>>(msg: T) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        Self::Validation(msg.into())
    }

    pub fn internal<T: Into<String>>(msg: T) -> Self {
        Self::Internal(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Unauthenticated(_) => ErrorKind::Unauthenticated,
            ApiError::Forbidden(_) => ErrorKind::Forbidden,
            ApiError::NotFound(_) => ErrorKind::NotFound,
            ApiError::Conflict(_) => ErrorKind::Conflict,
            ApiError::Validation(_) => ErrorKind::ValidationError,
            ApiError::Database(_)
            | ApiError::Migration(_)
            | ApiError::Config(_)
            | ApiError::Token(_)
            | ApiError::Internal(_) => ErrorKind::Infra,
        }
    }

    /// Converts a unique-constraint violation into `Conflict`, leaving any
    /// other driver error as an infrastructure failure.
    pub fn from_unique_violation(err: sqlx::Error, msg: &str) -> Self {
        let is_unique = err
            .as_database_error()
            .and_then(|db| db.code())
            .map(|code| code == "23505")
            .unwrap_or(false);

        if is_unique {
            ApiError::Conflict(msg.to_string())
        } else {
            ApiError::Database(err)
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v4();
        let kind = self.kind();

        let message = match &self {
            ApiError::Unauthenticated(msg) => {
                tracing::warn!(error_id = %error_id, error = %msg, "authentication error occurred");
                msg.clone()
            }
            ApiError::Forbidden(msg) => {
                tracing::warn!(error_id = %error_id, error = %msg, "authorization error occurred");
                msg.clone()
            }
            ApiError::NotFound(msg) => {
                tracing::info!(error_id = %error_id, error = %msg, "resource not found");
                msg.clone()
            }
            ApiError::Conflict(msg) => {
                tracing::warn!(error_id = %error_id, error = %msg, "conflict error occurred");
                msg.clone()
            }
            ApiError::Validation(msg) => {
                tracing::warn!(error_id = %error_id, error = %msg, "validation error occurred");
                msg.clone()
            }
            ApiError::Database(err) => {
                tracing::error!(error_id = %error_id, error = %err, "database error occurred");
                "Internal server error".to_string()
            }
            ApiError::Migration(err) => {
                tracing::error!(error_id = %error_id, error = %err, "database migration error occurred");
                "Internal server error".to_string()
            }
            ApiError::Config(err) => {
                tracing::error!(error_id = %error_id, error = %err, "configuration error occurred");
                "Internal server error".to_string()
            }
            ApiError::Token(err) => {
                tracing::error!(error_id = %error_id, error = %err, "credential signing failed");
                "Internal server error".to_string()
            }
            ApiError::Internal(msg) => {
                tracing::error!(error_id = %error_id, error = %msg, "internal server error occurred");
                "Internal server error".to_string()
            }
        };

        let body = Json(json!({
            "error": {
                "message": message,
                "code": kind.code(),
                "error_id": error_id,
                "timestamp": chrono::Utc::now().to_rfc3339(),
            }
        }));

        (kind.status_code(), body).into_response()
    }
}
