//! Contact API Handlers
//!
//! Contacts are mutated through one operation only: flipping the
//! completion flag. Ownership runs through the contact's client.

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::HeaderMap,
};
use serde_json::Value;

use shared::error::{AppError, AppResult};
use shared::models::contact::COMPLETED_ALIASES;

use crate::core::ServerState;
use crate::db::repository::{client, contact};
use crate::decorate;
use crate::identity;
use crate::ownership;
use crate::utils::validation::validate_optional_date;

/// The PATCH body carries exactly one piece of information, under any of
/// its accepted spellings.
fn completed_from_body(body: &Value) -> AppResult<bool> {
    if let Value::Object(map) = body {
        for key in COMPLETED_ALIASES {
            match map.get(*key) {
                Some(Value::Bool(b)) => return Ok(*b),
                Some(_) => {
                    return Err(AppError::validation(format!("{key} deve ser booleano")));
                }
                None => {}
            }
        }
    }
    Err(AppError::validation(
        "Informe o campo completed (booleano)",
    ))
}

/// GET /api/contatos?ate= - follow-up agenda, soonest first
pub async fn list(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> AppResult<Json<Vec<Value>>> {
    let user = identity::resolve(&headers, &query, None)?;
    let db = state.stores.for_user(user.id).await?;

    let until = query.get("ate").cloned().filter(|v| !v.is_empty());
    validate_optional_date(&until, "ate")?;

    let contacts = contact::list_upcoming(&db.pool, until.as_deref()).await?;
    let clients = client::brief_map(&db.pool).await?;

    let mut items = Vec::new();
    for c in &contacts {
        // Ownership re-derived per record through the owning client.
        let Some((nome, stored_owner)) = clients.get(&c.cliente_id) else {
            continue;
        };
        let owner = ownership::resolve_stored_owner(stored_owner);
        if owner != user.id {
            continue;
        }
        let mut decorated = decorate::contact_response(c, &owner);
        if let Some(map) = decorated.as_object_mut() {
            map.insert("clienteNome".to_string(), Value::String(nome.clone()));
        }
        items.push(decorated);
    }

    Ok(Json(items))
}

/// PATCH /api/contatos/:id - body `{completed: boolean}` only
pub async fn set_completed(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> AppResult<Json<Value>> {
    let user = identity::resolve(&headers, &query, Some(&body))?;
    let completed = completed_from_body(&body)?;

    let db = state.stores.for_user(user.id).await?;
    let existing = contact::find_by_id(&db.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Contato {id} não encontrado")))?;

    let owner_record = client::find_by_id(&db.pool, existing.cliente_id)
        .await?
        .map(|c| ownership::resolve_stored_owner(&c.user_id))
        .unwrap_or_else(|| ownership::resolve_stored_owner(""));
    ownership::ensure_owner(&owner_record, user)?;

    let updated = contact::set_realizado(&db, id, completed).await?;
    Ok(Json(decorate::contact_response(&updated, user.id)))
}
