//! Purchase model (compra) with embedded prescription (receita)

use serde::{Deserialize, Serialize};

/// One eye side of a prescription. All measurements are free-typed strings
/// exactly as the optician enters them; the backend never interprets them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Grau {
    pub esferico: Option<String>,
    pub cilindrico: Option<String>,
    pub eixo: Option<String>,
    /// Near pupillary distance
    pub dnp: Option<String>,
    pub adicao: Option<String>,
}

/// Prescription: right eye (od) / left eye (oe)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Receita {
    pub od: Option<Grau>,
    pub oe: Option<Grau>,
}

/// Purchase as stored. `receita` lives in a JSON text column, so the row
/// is mapped by hand in the repository. Embedded contacts are attached at
/// decoration time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub id: i64,
    pub cliente_id: i64,
    /// YYYY-MM-DD; the client's purchase list is kept sorted ascending on it
    pub data: String,
    pub armacao: Option<String>,
    pub lente: Option<String>,
    pub valor_armacao: Option<f64>,
    pub valor_lente: Option<f64>,
    /// Invoice reference
    pub nota_fiscal: Option<String>,
    pub receita: Option<Receita>,
    pub criado_em: i64,
    pub atualizado_em: i64,
}

/// Purchase payload embedded in client create/update.
///
/// With an `id` matching an existing purchase of the same client it updates
/// in place; without one it is appended as new.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseInput {
    pub id: Option<i64>,
    pub data: String,
    pub armacao: Option<String>,
    pub lente: Option<String>,
    pub valor_armacao: Option<f64>,
    pub valor_lente: Option<f64>,
    pub nota_fiscal: Option<String>,
    pub receita: Option<Receita>,
    /// Follow-up contacts scheduled with the purchase. Absent leaves the
    /// stored set untouched; present replaces it.
    pub contatos: Option<Vec<ContactInput>>,
}

/// Contact payload embedded in a purchase.
///
/// Either an explicit `dataContato` or a month offset (`meses`) from the
/// purchase date; the repository derives the date when only `meses` is given.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInput {
    pub data_contato: Option<String>,
    pub meses: Option<i64>,
    #[serde(
        default,
        deserialize_with = "super::serde_helpers::bool_false",
        alias = "completed",
        alias = "concluido"
    )]
    pub realizado: bool,
}
