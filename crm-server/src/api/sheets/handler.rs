//! Spreadsheet export handler

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Query, State},
    http::HeaderMap,
};
use serde_json::{Value, json};

use shared::error::AppResult;

use crate::core::ServerState;
use crate::db::repository::client;
use crate::identity;
use crate::ownership;

/// POST /api/planilha/exportar - push the requester's clients to the
/// configured spreadsheet. 503 with the missing prerequisites when the
/// integration is off.
pub async fn export(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> AppResult<Json<Value>> {
    let user = identity::resolve(&headers, &query, None)?;
    let db = state.stores.for_user(user.id).await?;

    let rows: Vec<Value> = client::search(&db.pool, None)
        .await?
        .into_iter()
        .filter(|c| ownership::resolve_stored_owner(&c.user_id) == user.id)
        .map(|c| {
            json!([
                c.id,
                c.nome,
                c.telefone,
                c.email,
                c.cpf,
                c.etapa,
                c.user_id,
            ])
        })
        .collect();

    let exported = state.sheets.export_clients(user.id, rows).await?;
    Ok(Json(json!({ "exported": exported })))
}
