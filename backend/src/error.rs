//! Error handling for the Stock Tracker
//!
//! Every failure is rendered as
//! `{"success": false, "error": {"code", "message", "field"?, "details"?}}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::StockError;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication errors
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Insufficient permissions")]
    InsufficientPermissions,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    // Validation errors
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {message}")]
    Validation {
        field: String,
        message: String,
        details: Option<serde_json::Value>,
    },

    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    #[error("Conflict: {message}")]
    Conflict { resource: String, message: String },

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Business logic errors
    #[error("Insufficient stock: {0}")]
    InsufficientStock(String),

    // Report rendering errors
    #[error("Export error: {0}")]
    Export(String),

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Validation failure tied to one input field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Map a unique-constraint violation to `DuplicateEntry(field)`
    pub fn unique_or(err: sqlx::Error, field: &str) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::DuplicateEntry(field.to_string())
            }
            _ => AppError::DatabaseError(err),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let field_errors = errors.field_errors();
        let mut fields: Vec<_> = field_errors.iter().collect();
        fields.sort_by_key(|(name, _)| **name);

        let details: serde_json::Map<String, serde_json::Value> = fields
            .iter()
            .map(|(name, errs)| {
                let messages: Vec<String> = errs
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("Invalid {}", name))
                    })
                    .collect();
                (name.to_string(), serde_json::json!(messages))
            })
            .collect();

        let (field, message) = fields
            .first()
            .map(|(name, errs)| {
                let message = errs
                    .first()
                    .and_then(|e| e.message.as_ref().map(|m| m.to_string()))
                    .unwrap_or_else(|| format!("Invalid {}", name));
                (name.to_string(), message)
            })
            .unwrap_or_else(|| ("input".to_string(), "Invalid input".to_string()));

        AppError::Validation {
            field,
            message,
            details: Some(serde_json::Value::Object(details)),
        }
    }
}

impl From<StockError> for AppError {
    fn from(err: StockError) -> Self {
        match err.field() {
            Some(field) => AppError::validation(field, err.to_string()),
            None => AppError::InsufficientStock(err.to_string()),
        }
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorDetail {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            field: None,
            details: None,
        }
    }

    fn with_field(mut self, field: &str) -> Self {
        self.field = Some(field.to_string());
        self
    }
}

impl ErrorResponse {
    pub fn new(error: ErrorDetail) -> Self {
        Self {
            success: false,
            error,
        }
    }
}

impl AppError {
    fn status_and_detail(&self) -> (StatusCode, ErrorDetail) {
        match self {
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail::new("INVALID_CREDENTIALS", "Invalid email or password"),
            ),
            AppError::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail::new("TOKEN_EXPIRED", "Token has expired"),
            ),
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail::new("INVALID_TOKEN", "Invalid token"),
            ),
            AppError::InsufficientPermissions => (
                StatusCode::FORBIDDEN,
                ErrorDetail::new(
                    "INSUFFICIENT_PERMISSIONS",
                    "You do not have permission to perform this action",
                ),
            ),
            AppError::Unauthorized(message) => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail::new("UNAUTHORIZED", message.clone()),
            ),
            AppError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail::new("BAD_REQUEST", message.clone()),
            ),
            AppError::Validation {
                field,
                message,
                details,
            } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message: message.clone(),
                    field: Some(field.clone()),
                    details: details.clone(),
                },
            ),
            AppError::DuplicateEntry(field) => (
                StatusCode::CONFLICT,
                ErrorDetail::new(
                    "DUPLICATE_ENTRY",
                    format!("A record with this {} already exists", field),
                )
                .with_field(field),
            ),
            AppError::Conflict { resource, message } => (
                StatusCode::CONFLICT,
                ErrorDetail::new("CONFLICT", message.clone()).with_field(resource),
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail::new("NOT_FOUND", format!("{} not found", resource)),
            ),
            AppError::InsufficientStock(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail::new("INSUFFICIENT_STOCK", msg.clone()),
            ),
            AppError::Export(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new("EXPORT_ERROR", format!("Failed to generate report: {}", msg)),
            ),
            AppError::DatabaseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new("DATABASE_ERROR", "A database error occurred"),
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new("INTERNAL_ERROR", msg.clone()),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = self.status_and_detail();

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse::new(error_detail))).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use validator::Validate;

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (AppError::InsufficientPermissions, StatusCode::FORBIDDEN),
            (AppError::NotFound("Item".into()), StatusCode::NOT_FOUND),
            (AppError::DuplicateEntry("name".into()), StatusCode::CONFLICT),
            (
                AppError::InsufficientStock("none left".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (AppError::validation("month", "bad"), StatusCode::BAD_REQUEST),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_stock_error_conversion() {
        let err: AppError = StockError::InsufficientStock {
            available: Decimal::from(3),
            requested: Decimal::from(5),
        }
        .into();
        assert!(matches!(err, AppError::InsufficientStock(_)));

        let err: AppError = StockError::NegativeQuantity { field: "cr_qty" }.into();
        match err {
            AppError::Validation { field, .. } => assert_eq!(field, "cr_qty"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_validator_errors_name_first_field() {
        let input = shared::RegisterInput {
            name: "Store Keeper".into(),
            email: "not-an-email".into(),
            password: "short".into(),
        };
        let err: AppError = input.validate().unwrap_err().into();
        match err {
            AppError::Validation { field, details, .. } => {
                assert_eq!(field, "email");
                let details = details.unwrap();
                assert!(details.get("password").is_some());
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
