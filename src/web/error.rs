use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use tracing::error;

use crate::error::BookingError;
use crate::web::templates::{NotFoundTemplate, ServerErrorTemplate};

/// Failures that end a request with an error page
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    Internal(String),
}

impl From<BookingError> for AppError {
    fn from(e: BookingError) -> Self {
        match e {
            BookingError::NotFound { .. } => AppError::NotFound(e.to_string()),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, page) = match self {
            AppError::NotFound(_) => (
                StatusCode::NOT_FOUND,
                NotFoundTemplate {
                    notice: String::new(),
                }
                .render(),
            ),
            AppError::Internal(msg) => {
                error!("Request failed: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ServerErrorTemplate {
                        notice: String::new(),
                    }
                    .render(),
                )
            }
        };
        match page {
            Ok(body) => (status, Html(body)).into_response(),
            Err(e) => {
                error!("Error page could not be rendered: {}", e);
                (status, status.canonical_reason().unwrap_or("Error")).into_response()
            }
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not Found: {msg}"),
            AppError::Internal(msg) => write!(f, "Internal Error: {msg}"),
        }
    }
}

pub type AppResult<T> = std::result::Result<T, AppError>;
