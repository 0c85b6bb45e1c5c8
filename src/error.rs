use thiserror::Error;
use actix_web::{ResponseError, HttpResponse, http::StatusCode};
use serde_json::json;
use std::time::Duration;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] DatabaseError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    /// Stable machine-readable name of the error, sent as `error_kind`.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "validation_error",
            AppError::StoreUnavailable(_) => "store_unavailable",
            AppError::ConfigError(_) => "config_error",
            AppError::InternalError(_) => "internal_error",
        }
    }
}

// Implement conversion from config::ConfigError
impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::StoreUnavailable(err.into())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(err.to_string())
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let response = json!({
            "error_kind": self.kind(),
            "message": self.to_string(),
        });
        HttpResponse::build(self.status_code()).json(response)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Failures of the backing store. All of them are transient from the
/// caller's point of view and safe to retry with backoff.
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error("Query timed out after {0:?}")]
    Timeout(Duration),
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut => DatabaseError::ConnectionError(
                "timed out acquiring a connection from the pool".to_string(),
            ),
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
            | sqlx::Error::Configuration(_) => DatabaseError::ConnectionError(err.to_string()),
            _ => DatabaseError::QueryError(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::InternalError(_)));

        let config_err = config::ConfigError::NotFound(String::from("key not found"));
        let app_err: AppError = config_err.into();
        assert!(matches!(app_err, AppError::ConfigError(_)));

        let app_err: AppError = sqlx::Error::PoolClosed.into();
        assert!(matches!(
            app_err,
            AppError::StoreUnavailable(DatabaseError::ConnectionError(_))
        ));

        let app_err: AppError = sqlx::Error::RowNotFound.into();
        assert!(matches!(
            app_err,
            AppError::StoreUnavailable(DatabaseError::QueryError(_))
        ));

        let app_err: AppError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(
            app_err,
            AppError::StoreUnavailable(DatabaseError::ConnectionError(_))
        ));
    }

    #[test]
    fn test_error_status_codes() {
        let err = AppError::ValidationError("invalid input".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err = AppError::StoreUnavailable(DatabaseError::Timeout(Duration::from_secs(5)));
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);

        let err = AppError::ConfigError("missing".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_display() {
        let err = AppError::ValidationError("test error".to_string());
        assert_eq!(err.to_string(), "Validation error: test error");

        let err = AppError::StoreUnavailable(DatabaseError::QueryError("boom".to_string()));
        assert_eq!(err.to_string(), "Store unavailable: Query error: boom");
    }

    #[actix_web::test]
    async fn test_error_body_shape() {
        let err = AppError::ValidationError("radius_m must be positive".to_string());
        let response = err.error_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = actix_web::body::to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error_kind"], "validation_error");
        assert_eq!(json["message"], "Validation error: radius_m must be positive");
    }
}
