mod categories;
mod questions;
mod quizzes;

pub use categories::category_router;
pub use questions::questions_router;
pub use quizzes::quiz_router;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// Rendered without a body, unlike the other statuses.
    #[error("Bad Request")]
    BadRequest,
    #[error("Not Found")]
    NotFound,
    #[error("Unprocessable Entity")]
    Unprocessable,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type ApiResponse<T> = Result<T, ApiError>;

#[derive(Serialize)]
struct Envelope {
    success: bool,
    error: u16,
    message: &'static str,
}

fn envelope(status: StatusCode) -> Response {
    let body = Envelope {
        success: false,
        error: status.as_u16(),
        message: status.canonical_reason().unwrap_or_default(),
    };
    (status, Json(body)).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest => StatusCode::BAD_REQUEST.into_response(),
            ApiError::NotFound | ApiError::Database(sqlx::Error::RowNotFound) => {
                envelope(StatusCode::NOT_FOUND)
            }
            ApiError::Unprocessable => envelope(StatusCode::UNPROCESSABLE_ENTITY),
            ApiError::Database(error) => {
                tracing::error!("Unhandled database error: {error}");
                envelope(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

/// Result of a write whose failure is reported in the body, never in the status.
#[derive(Debug, PartialEq)]
pub enum Outcome {
    Succeeded(String),
    Failed(String),
}

#[derive(Serialize)]
struct OutcomeBody<'a> {
    success: bool,
    message: &'a str,
}

impl Serialize for Outcome {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let body = match self {
            Outcome::Succeeded(message) => OutcomeBody {
                success: true,
                message,
            },
            Outcome::Failed(message) => OutcomeBody {
                success: false,
                message,
            },
        };
        body.serialize(serializer)
    }
}

impl IntoResponse for Outcome {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
