//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! It centralizes error management, providing a consistent way to handle and represent
//! various error conditions that can occur, from database issues to validation failures.
//!
//! `AppError` implements `actix_web::error::ResponseError` to seamlessly convert
//! application errors into appropriate HTTP responses with JSON bodies.
//! It also provides `From` trait implementations for common error types like `sqlx::Error`,
//! `validator::ValidationErrors`, `jsonwebtoken::errors::Error`, and `bcrypt::BcryptError`,
//! allowing for easy conversion using the `?` operator.
//!
//! Two mappings are part of the API contract: validation failures respond with
//! 400 (not 422), and any authentication failure on a protected route responds
//! with 404 rather than 401, masking whether the resource exists.

use actix_web::{error::ResponseError, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Represents all possible errors that can occur within the application.
///
/// Each variant corresponds to a specific type of error, often carrying a message
/// detailing the issue. These errors are then converted into appropriate HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// A client-side error due to a malformed or otherwise unacceptable request (HTTP 400).
    /// Also used for failed login attempts.
    BadRequest(String),
    /// Failed input validation: schema violations, forbidden fields (HTTP 400).
    Validation(String),
    /// A missing, invalid, or revoked bearer token on a protected route (HTTP 404).
    Unauthenticated,
    /// A requested resource is absent, or is owned by a different user (HTTP 404).
    /// Ownership mismatches are indistinguishable from absence.
    NotFound(String),
    /// A multipart upload was rejected by the size or file-type filter (HTTP 400).
    Upload(String),
    /// An error originating from database operations (HTTP 500).
    /// Wraps errors from the `sqlx` crate.
    Database(String),
    /// An unexpected server-side error not covered by more specific types (HTTP 500).
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::Validation(msg) => write!(f, "Validation Error: {}", msg),
            AppError::Unauthenticated => write!(f, "Please authenticate."),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Upload(msg) => write!(f, "Upload Error: {}", msg),
            AppError::Database(msg) => write!(f, "Database Error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

/// Converts `AppError` variants into `HttpResponse` objects.
///
/// This implementation allows Actix Web to automatically translate `AppError`
/// results from handlers into the correct HTTP status codes and JSON error responses.
impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::BadRequest(msg) => HttpResponse::BadRequest().json(json!({
                "error": msg
            })),
            AppError::Validation(msg) => HttpResponse::BadRequest().json(json!({
                "error": msg
            })),
            AppError::Unauthenticated => HttpResponse::NotFound().json(json!({
                "error": "Please authenticate."
            })),
            AppError::NotFound(msg) => HttpResponse::NotFound().json(json!({
                "error": msg
            })),
            AppError::Upload(msg) => HttpResponse::BadRequest().json(json!({
                "error": msg
            })),
            // Database errors are presented as generic internal server errors to the client.
            AppError::Database(msg) => HttpResponse::InternalServerError().json(json!({
                "error": msg
            })),
            AppError::Internal(msg) => HttpResponse::InternalServerError().json(json!({
                "error": msg
            })),
        }
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// `sqlx::Error::RowNotFound` maps to `AppError::NotFound`, a unique-index
/// violation (duplicate email) maps to `AppError::BadRequest`, and other
/// database errors become `AppError::Database`.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match &error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
                AppError::BadRequest("Email already registered".into())
            }
            _ => AppError::Database(error.to_string()),
        }
    }
}

/// Converts `validator::ValidationErrors` into `AppError::Validation`.
///
/// The detailed validation messages are preserved.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::Validation(error.to_string())
    }
}

/// Converts `jsonwebtoken::errors::Error` into `AppError::Unauthenticated`.
///
/// This is typically used when JWT processing (e.g., verification) fails.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(_: jsonwebtoken::errors::Error) -> AppError {
        AppError::Unauthenticated
    }
}

/// Converts `bcrypt::BcryptError` into `AppError::Internal`.
///
/// This handles errors during password hashing or verification.
impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::Internal(error.to_string())
    }
}

/// Converts multipart parsing failures into `AppError::Upload`.
impl From<actix_multipart::MultipartError> for AppError {
    fn from(error: actix_multipart::MultipartError) -> AppError {
        AppError::Upload(error.to_string())
    }
}

/// Converts image decode/encode failures into `AppError::Upload`.
///
/// An undecodable avatar is a rejected upload, not a server fault.
impl From<image::ImageError> for AppError {
    fn from(error: image::ImageError) -> AppError {
        AppError::Upload(error.to_string())
    }
}
