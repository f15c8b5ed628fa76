//! Core module - configuration, state and server lifecycle

pub mod config;
pub mod server;
pub mod state;

pub use config::{Config, SheetsConfig};
pub use server::Server;
pub use state::ServerState;
