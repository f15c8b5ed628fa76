//! User roster entry
//!
//! Users are a fixed roster defined at process start, not database rows.
//! `id` is the canonical slug every identity candidate normalizes to.

use serde::Serialize;

/// Access level of a roster user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    /// Full access, sees store-level operations (export, seeding)
    Total,
    /// Regular sales access
    Padrao,
}

/// Role of a roster user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Gerente,
    Vendedor,
    Balcao,
}

/// Static roster entry. Immutable for the process lifetime.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct User {
    /// Canonical slug (`loja`, `renata`, ...)
    pub id: &'static str,
    /// Display name
    pub nome: &'static str,
    pub nivel: AccessLevel,
    pub papel: Role,
}
