//! Client model (cliente)

use serde::{Deserialize, Serialize};

use super::purchase::PurchaseInput;
use super::serde_helpers;

/// Client entity as stored (one row per client in the owning user's store).
///
/// `interesses` lives in a JSON text column, so this row is mapped by hand
/// in the repository rather than via `FromRow`. Embedded purchases are not
/// part of the struct; they are attached at decoration time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: i64,
    pub nome: String,
    pub telefone: Option<String>,
    pub email: Option<String>,
    /// Stored as typed; uniqueness compares digits only
    pub cpf: Option<String>,
    pub genero: Option<String>,
    /// YYYY-MM-DD
    pub data_nascimento: Option<String>,
    /// Post-sale contact consent
    pub aceita_contato: bool,
    /// Classification (`novo`, `recorrente`, ...)
    pub tipo_cliente: Option<String>,
    /// Lifecycle tag (`prospecto`, `ativo`, `inativo`, ...)
    pub etapa: Option<String>,
    /// Free-form interest tags, deduplicated case-insensitively
    pub interesses: Vec<String>,
    /// Canonical owning user id
    pub user_id: String,
    pub criado_em: i64,
    pub atualizado_em: i64,
}

/// Create payload (`POST /api/clientes`)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientCreate {
    pub nome: String,
    pub telefone: Option<String>,
    pub email: Option<String>,
    pub cpf: Option<String>,
    pub genero: Option<String>,
    pub data_nascimento: Option<String>,
    /// Consent defaults to true when absent or null
    #[serde(default = "default_true", deserialize_with = "serde_helpers::bool_true")]
    pub aceita_contato: bool,
    pub tipo_cliente: Option<String>,
    pub etapa: Option<String>,
    #[serde(default)]
    pub interesses: Vec<String>,
    /// Purchases created alongside the client
    #[serde(default)]
    pub compras: Vec<PurchaseInput>,
}

fn default_true() -> bool {
    true
}

/// Partial update payload (`PUT /api/clientes/{id}`)
///
/// Absent = unchanged, null = cleared (see [`serde_helpers::double_option`]).
/// `nome` cannot be cleared; an explicit null is a validation error caught
/// by the handler.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientUpdate {
    #[serde(default, deserialize_with = "serde_helpers::double_option")]
    pub nome: Option<Option<String>>,
    #[serde(default, deserialize_with = "serde_helpers::double_option")]
    pub telefone: Option<Option<String>>,
    #[serde(default, deserialize_with = "serde_helpers::double_option")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "serde_helpers::double_option")]
    pub cpf: Option<Option<String>>,
    #[serde(default, deserialize_with = "serde_helpers::double_option")]
    pub genero: Option<Option<String>>,
    #[serde(default, deserialize_with = "serde_helpers::double_option")]
    pub data_nascimento: Option<Option<String>>,
    #[serde(default, deserialize_with = "serde_helpers::double_option")]
    pub aceita_contato: Option<Option<bool>>,
    #[serde(default, deserialize_with = "serde_helpers::double_option")]
    pub tipo_cliente: Option<Option<String>>,
    #[serde(default, deserialize_with = "serde_helpers::double_option")]
    pub etapa: Option<Option<String>>,
    #[serde(default, deserialize_with = "serde_helpers::double_option")]
    pub interesses: Option<Option<Vec<String>>>,
    /// Absent = purchases untouched; present = upsert each entry by id
    pub compras: Option<Vec<PurchaseInput>>,
}

/// Deduplicate interest tags case-insensitively, dropping blanks.
/// First spelling wins: `["Lentes", "lentes", " "]` → `["Lentes"]`.
pub fn dedup_interesses(raw: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    raw.iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.to_lowercase()))
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedup_is_case_insensitive_and_drops_blanks() {
        let raw = vec![
            "Lentes".to_string(),
            "lentes".to_string(),
            "  ".to_string(),
            "Armações".to_string(),
            "LENTES".to_string(),
        ];
        assert_eq!(dedup_interesses(&raw), vec!["Lentes", "Armações"]);
    }

    #[test]
    fn create_consent_defaults_to_true() {
        let c: ClientCreate = serde_json::from_str(r#"{"nome":"Ana"}"#).unwrap();
        assert!(c.aceita_contato);
        let c: ClientCreate =
            serde_json::from_str(r#"{"nome":"Ana","aceitaContato":null}"#).unwrap();
        assert!(c.aceita_contato);
        let c: ClientCreate =
            serde_json::from_str(r#"{"nome":"Ana","aceitaContato":false}"#).unwrap();
        assert!(!c.aceita_contato);
    }
}
