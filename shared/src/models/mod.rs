//! Entity models
//!
//! Wire field names follow what the SPA already speaks (Portuguese,
//! camelCase). Database row mapping lives in the server's repository
//! layer; models that map 1:1 onto scalar columns derive `sqlx::FromRow`
//! behind the `db` feature.

pub mod client;
pub mod contact;
pub mod event;
pub mod purchase;
pub mod serde_helpers;
pub mod user;

pub use client::{Client, ClientCreate, ClientUpdate};
pub use contact::{Contact, ContactStatus, derive_status};
pub use event::{Event, EventCreate, EventUpdate};
pub use purchase::{Grau, Purchase, PurchaseInput, Receita};
pub use user::{AccessLevel, Role, User};
