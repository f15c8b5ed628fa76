//! Event API Handlers
//!
//! Range listings merge stored events with synthetic contact entries.
//! Ownership is re-derived for every row on every request, stored events
//! and contact-derived ones alike; a stale or foreign owner field must
//! never leak another user's rows into the response.

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::HeaderMap,
};
use http::StatusCode;
use serde_json::Value;

use shared::error::{AppError, AppResult};
use shared::models::{Event, EventCreate, EventUpdate};

use crate::core::ServerState;
use crate::db::DbService;
use crate::db::repository::{client, contact, event};
use crate::decorate;
use crate::identity;
use crate::ownership;
use crate::utils::time::parse_date;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_required_text,
    validate_optional_text,
};

fn decorated_event(e: &Event, requester: &str) -> Value {
    let value = serde_json::to_value(e).unwrap_or_else(|_| Value::Null);
    decorate::decorate_event_value(value, requester)
}

/// A referenced client must exist in the requester's store and resolve to
/// the requester.
async fn check_cliente_ref(db: &DbService, cliente_id: i64, requester: &str) -> AppResult<()> {
    let owned = client::find_by_id(&db.pool, cliente_id)
        .await?
        .map(|c| ownership::resolve_stored_owner(&c.user_id) == requester)
        .unwrap_or(false);
    if owned {
        Ok(())
    } else {
        Err(AppError::not_found(format!(
            "Cliente {cliente_id} não encontrado"
        )))
    }
}

fn validate_create(data: &EventCreate) -> AppResult<()> {
    validate_required_text(&data.titulo, "titulo", MAX_NAME_LEN)?;
    parse_date(&data.data)?;
    validate_optional_text(&data.descricao, "descricao", MAX_NOTE_LEN)?;
    validate_optional_text(&data.cor, "cor", MAX_SHORT_TEXT_LEN)?;
    Ok(())
}

fn validate_update(data: &EventUpdate) -> AppResult<()> {
    match &data.titulo {
        Some(Some(titulo)) => validate_required_text(titulo, "titulo", MAX_NAME_LEN)?,
        Some(None) => return Err(AppError::validation("titulo não pode ser nulo")),
        None => {}
    }
    match &data.data {
        Some(Some(d)) => {
            parse_date(d)?;
        }
        Some(None) => return Err(AppError::validation("data não pode ser nula")),
        None => {}
    }
    if let Some(Some(descricao)) = &data.descricao {
        validate_optional_text(&Some(descricao.clone()), "descricao", MAX_NOTE_LEN)?;
    }
    if let Some(Some(cor)) = &data.cor {
        validate_optional_text(&Some(cor.clone()), "cor", MAX_SHORT_TEXT_LEN)?;
    }
    Ok(())
}

/// GET /api/eventos?from=&to=
///
/// With a range: stored events merged with synthetic contact events,
/// both inside the inclusive range, ordered by date. Without one: all
/// stored events, newest-id-first. `from`/`to` must be YYYY-MM-DD with
/// `from <= to`.
pub async fn list(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> AppResult<Json<Vec<Value>>> {
    let user = identity::resolve(&headers, &query, None)?;
    let db = state.stores.for_user(user.id).await?;

    let from = query.get("from").cloned().filter(|v| !v.is_empty());
    let to = query.get("to").cloned().filter(|v| !v.is_empty());

    let range = match (from, to) {
        (Some(from), Some(to)) => {
            let start = parse_date(&from)?;
            let end = parse_date(&to)?;
            if start > end {
                return Err(AppError::validation("Intervalo inválido: from > to"));
            }
            Some((from, to))
        }
        (None, None) => None,
        _ => {
            return Err(AppError::validation(
                "Informe from e to juntos (YYYY-MM-DD)",
            ));
        }
    };

    let mut items = Vec::new();
    match range {
        None => {
            for e in event::find_all(&db.pool).await? {
                if ownership::resolve_stored_owner(&e.user_id) == user.id {
                    items.push(decorated_event(&e, user.id));
                }
            }
        }
        Some((from, to)) => {
            for e in event::find_in_range(&db.pool, &from, &to).await? {
                if ownership::resolve_stored_owner(&e.user_id) == user.id {
                    items.push(decorated_event(&e, user.id));
                }
            }

            let clients = client::brief_map(&db.pool).await?;
            for c in contact::list_in_range(&db.pool, &from, &to).await? {
                let Some((nome, stored_owner)) = clients.get(&c.cliente_id) else {
                    continue;
                };
                if ownership::resolve_stored_owner(stored_owner) != user.id {
                    continue;
                }
                items.push(decorate::contact_event(&c, Some(nome.as_str()), user.id));
            }

            items.sort_by(|a, b| {
                let da = a.get("data").and_then(Value::as_str).unwrap_or("");
                let db_ = b.get("data").and_then(Value::as_str).unwrap_or("");
                da.cmp(db_)
            });
        }
    }

    Ok(Json(items))
}

/// POST /api/eventos
pub async fn create(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let user = identity::resolve(&headers, &query, Some(&body))?;
    let data: EventCreate = serde_json::from_value(body.clone())
        .map_err(|e| AppError::validation(format!("Payload inválido: {e}")))?;
    validate_create(&data)?;

    let db = state.stores.for_user(user.id).await?;
    if let Some(cliente_id) = data.cliente_id {
        check_cliente_ref(&db, cliente_id, user.id).await?;
    }

    let owner = ownership::resolve_owner(&body, Some(user.id));
    let created = event::create(&db, data, &owner).await?;
    Ok((StatusCode::CREATED, Json(decorated_event(&created, user.id))))
}

/// PUT /api/eventos/:id - partial update (absent keeps, null clears)
pub async fn update(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> AppResult<Json<Value>> {
    let user = identity::resolve(&headers, &query, Some(&body))?;
    let data: EventUpdate = serde_json::from_value(body)
        .map_err(|e| AppError::validation(format!("Payload inválido: {e}")))?;
    validate_update(&data)?;

    let db = state.stores.for_user(user.id).await?;
    let existing = event::find_by_id(&db.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Evento {id} não encontrado")))?;
    ownership::ensure_owner(&ownership::resolve_stored_owner(&existing.user_id), user)?;

    if let Some(Some(cliente_id)) = data.cliente_id {
        check_cliente_ref(&db, cliente_id, user.id).await?;
    }

    let updated = event::update(&db, id, data).await?;
    Ok(Json(decorated_event(&updated, user.id)))
}

/// DELETE /api/eventos/:id
pub async fn delete(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let user = identity::resolve(&headers, &query, None)?;
    let db = state.stores.for_user(user.id).await?;

    let existing = event::find_by_id(&db.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Evento {id} não encontrado")))?;
    ownership::ensure_owner(&ownership::resolve_stored_owner(&existing.user_id), user)?;

    let deleted = event::delete(&db, id).await?;
    Ok(Json(deleted))
}
