//! Calendar event model (evento)

use serde::{Deserialize, Serialize};

use super::serde_helpers;

/// Stored calendar event. Synthetic contact events are generated at read
/// time from contacts and never hit this table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Event {
    pub id: i64,
    /// YYYY-MM-DD
    pub data: String,
    pub titulo: String,
    pub descricao: Option<String>,
    pub cor: Option<String>,
    /// Optional linked client; must belong to the same user
    pub cliente_id: Option<i64>,
    pub concluido: bool,
    /// Canonical owning user id
    pub user_id: String,
    pub criado_em: i64,
    pub atualizado_em: i64,
}

/// Create payload (`POST /api/eventos`)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventCreate {
    pub data: String,
    pub titulo: String,
    pub descricao: Option<String>,
    pub cor: Option<String>,
    pub cliente_id: Option<i64>,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub concluido: bool,
}

/// Partial update payload (`PUT /api/eventos/{id}`)
///
/// Absent = unchanged, null = cleared. `data` and `titulo` cannot be
/// cleared; explicit nulls there are validation errors.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventUpdate {
    #[serde(default, deserialize_with = "serde_helpers::double_option")]
    pub data: Option<Option<String>>,
    #[serde(default, deserialize_with = "serde_helpers::double_option")]
    pub titulo: Option<Option<String>>,
    #[serde(default, deserialize_with = "serde_helpers::double_option")]
    pub descricao: Option<Option<String>>,
    #[serde(default, deserialize_with = "serde_helpers::double_option")]
    pub cor: Option<Option<String>>,
    #[serde(default, deserialize_with = "serde_helpers::double_option")]
    pub cliente_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "serde_helpers::double_option")]
    pub concluido: Option<Option<bool>>,
}
