//! Utility module - shared helpers for handlers and repositories

pub mod logger;
pub mod time;
pub mod validation;

// Re-export error types so handlers import from one place
pub use shared::error::{AppError, AppResult};
