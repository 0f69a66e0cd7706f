// src/errors.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::services::{leave::LeaveError, payroll::PayrollError};

#[derive(Debug, Error)]
pub enum AppError {
    // Database errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    // Auth errors
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid token")]
    InvalidToken,

    // Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid date range: {0}")]
    InvalidDateRange(String),

    // Business logic errors
    #[error("{0}")]
    AttendanceMissing(String),

    #[error("{0}")]
    DuplicatePeriod(String),

    #[error("{0}")]
    AlreadyDecided(String),

    #[error("Calculation error: {0}")]
    Calculation(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_)
            | AppError::DuplicatePeriod(_)
            | AppError::AlreadyDecided(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Validation(_) | AppError::InvalidDateRange(_) => StatusCode::BAD_REQUEST,
            AppError::AttendanceMissing(_) | AppError::Calculation(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = json!({
            "error": {
                "code": status.as_u16(),
                "message": self.to_string(),
            }
        });
        (status, Json(body)).into_response()
    }
}

impl From<PayrollError> for AppError {
    fn from(err: PayrollError) -> Self {
        match err {
            PayrollError::AttendanceMissing { .. } => AppError::AttendanceMissing(err.to_string()),
            PayrollError::DuplicatePeriod { .. } => AppError::DuplicatePeriod(err.to_string()),
            PayrollError::EmployeeNotFound(id) => {
                AppError::NotFound(format!("Employee {} not found", id))
            }
            PayrollError::Calculation(msg) => AppError::Calculation(msg),
            PayrollError::Persistence(e) => AppError::Database(e),
        }
    }
}

impl From<LeaveError> for AppError {
    fn from(err: LeaveError) -> Self {
        match err {
            LeaveError::RequestNotFound(id) => {
                AppError::NotFound(format!("Leave request {} not found", id))
            }
            LeaveError::AlreadyDecided { .. } => AppError::AlreadyDecided(err.to_string()),
            LeaveError::InvalidDateRange(msg) => AppError::InvalidDateRange(msg),
            LeaveError::Persistence(e) => AppError::Database(e),
        }
    }
}

// Convenience alias
pub type AppResult<T> = Result<T, AppError>;
