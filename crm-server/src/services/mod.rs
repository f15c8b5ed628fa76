//! External services

pub mod sheets;

pub use sheets::SheetsService;
