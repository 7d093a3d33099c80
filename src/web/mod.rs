//! HTTP surface: axum router, handlers and askama pages.

pub mod error;
pub mod handlers;
pub mod router;
pub mod state;
pub mod templates;
pub mod views;

pub use error::AppError;
pub use router::app_router;
pub use state::AppState;
