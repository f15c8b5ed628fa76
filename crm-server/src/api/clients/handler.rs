//! Client API Handlers
//!
//! Mutating flow per request: resolve identity → resolve store handle →
//! validate schema → load existing (update/delete) → resolve+check owner
//! → store operation → decorate → respond. Validation failures never
//! reach storage; a missing record after the owner check passes is 404,
//! not 403.

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::HeaderMap,
};
use http::StatusCode;
use serde_json::Value;

use shared::error::{AppError, AppResult};
use shared::models::purchase::PurchaseInput;
use shared::models::{Client, ClientCreate, ClientUpdate};
use shared::response::Page;

use crate::core::ServerState;
use crate::db::DbService;
use crate::db::repository::{client, contact, purchase};
use crate::decorate;
use crate::identity;
use crate::ownership;
use crate::utils::validation::{
    MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_date,
    validate_optional_text, validate_required_text,
};

/// Fixed page size of the client listing
const PAGE_SIZE: u32 = 10;

/// Fetch a client's purchases and contacts, then decorate the whole record.
async fn decorated_client(db: &DbService, c: &Client, requester: &str) -> AppResult<Value> {
    let purchases = purchase::list_for_client(&db.pool, c.id).await?;
    let mut with_contacts = Vec::with_capacity(purchases.len());
    for p in purchases {
        let contatos = contact::list_for_purchase(&db.pool, p.id).await?;
        with_contacts.push((p, contatos));
    }
    Ok(decorate::client_response(c, &with_contacts, requester))
}

fn validate_purchases(compras: &[PurchaseInput]) -> AppResult<()> {
    for compra in compras {
        validate_required_text(&compra.data, "data da compra", MAX_SHORT_TEXT_LEN)?;
        validate_optional_date(&Some(compra.data.clone()), "data da compra")?;
        validate_optional_text(&compra.armacao, "armacao", MAX_NAME_LEN)?;
        validate_optional_text(&compra.lente, "lente", MAX_NAME_LEN)?;
        validate_optional_text(&compra.nota_fiscal, "notaFiscal", MAX_SHORT_TEXT_LEN)?;
        if let Some(contatos) = &compra.contatos {
            for c in contatos {
                validate_optional_date(&c.data_contato, "dataContato")?;
                if c.data_contato.is_none() && c.meses.is_none() {
                    return Err(AppError::validation(
                        "Contato precisa de dataContato ou meses",
                    ));
                }
            }
        }
    }
    Ok(())
}

fn validate_create(data: &ClientCreate) -> AppResult<()> {
    validate_required_text(&data.nome, "nome", MAX_NAME_LEN)?;
    validate_optional_text(&data.telefone, "telefone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&data.email, "email", MAX_EMAIL_LEN)?;
    validate_optional_text(&data.cpf, "cpf", MAX_SHORT_TEXT_LEN)?;
    validate_optional_date(&data.data_nascimento, "dataNascimento")?;
    validate_purchases(&data.compras)
}

fn validate_update(data: &ClientUpdate) -> AppResult<()> {
    match &data.nome {
        Some(Some(nome)) => validate_required_text(nome, "nome", MAX_NAME_LEN)?,
        Some(None) => return Err(AppError::validation("nome não pode ser nulo")),
        None => {}
    }
    if let Some(Some(telefone)) = &data.telefone {
        validate_required_text(telefone, "telefone", MAX_SHORT_TEXT_LEN)?;
    }
    if let Some(Some(email)) = &data.email {
        validate_required_text(email, "email", MAX_EMAIL_LEN)?;
    }
    if let Some(Some(cpf)) = &data.cpf {
        validate_required_text(cpf, "cpf", MAX_SHORT_TEXT_LEN)?;
    }
    if let Some(Some(nascimento)) = &data.data_nascimento {
        validate_optional_date(&Some(nascimento.clone()), "dataNascimento")?;
    }
    if let Some(compras) = &data.compras {
        validate_purchases(compras)?;
    }
    Ok(())
}

/// GET /api/clientes?q=&page= - user-scoped paginated search
pub async fn list(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> AppResult<Json<Page<Value>>> {
    let user = identity::resolve(&headers, &query, None)?;
    let db = state.stores.for_user(user.id).await?;

    let q = query.get("q").map(String::as_str);
    let page = query
        .get("page")
        .and_then(|p| p.parse::<u32>().ok())
        .unwrap_or(1)
        .max(1);

    // Ownership is re-derived per record before pagination; the store
    // being per-user is not trusted, fallback ids can leak foreign rows.
    let all = client::search(&db.pool, q).await?;
    let owned: Vec<&Client> = all
        .iter()
        .filter(|c| ownership::resolve_stored_owner(&c.user_id) == user.id)
        .collect();

    let total = owned.len() as u64;
    let start = (page.saturating_sub(1) as usize).saturating_mul(PAGE_SIZE as usize);
    let mut items = Vec::new();
    for c in owned.into_iter().skip(start).take(PAGE_SIZE as usize) {
        items.push(decorated_client(&db, c, user.id).await?);
    }

    Ok(Json(Page::new(items, page, PAGE_SIZE, total)))
}

/// GET /api/clientes/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    let user = identity::resolve(&headers, &query, None)?;
    let db = state.stores.for_user(user.id).await?;

    let c = client::find_by_id(&db.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Cliente {id} não encontrado")))?;
    ownership::ensure_owner(&ownership::resolve_stored_owner(&c.user_id), user)?;

    Ok(Json(decorated_client(&db, &c, user.id).await?))
}

/// POST /api/clientes - create with embedded purchases
pub async fn create(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let user = identity::resolve(&headers, &query, Some(&body))?;
    let data: ClientCreate = serde_json::from_value(body.clone())
        .map_err(|e| AppError::validation(format!("Payload inválido: {e}")))?;
    validate_create(&data)?;

    let db = state.stores.for_user(user.id).await?;
    // The record's owner comes from the payload's alias fields when they
    // resolve, else from the requester.
    let owner = ownership::resolve_owner(&body, Some(user.id));
    let created = client::create(&db, data, &owner).await?;

    let decorated = decorated_client(&db, &created, user.id).await?;
    Ok((StatusCode::CREATED, Json(decorated)))
}

/// PUT /api/clientes/:id - partial update (absent keeps, null clears)
pub async fn update(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> AppResult<Json<Value>> {
    let user = identity::resolve(&headers, &query, Some(&body))?;
    let data: ClientUpdate = serde_json::from_value(body)
        .map_err(|e| AppError::validation(format!("Payload inválido: {e}")))?;
    validate_update(&data)?;

    let db = state.stores.for_user(user.id).await?;
    let existing = client::find_by_id(&db.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Cliente {id} não encontrado")))?;
    ownership::ensure_owner(&ownership::resolve_stored_owner(&existing.user_id), user)?;

    let updated = client::update(&db, id, data).await?;
    Ok(Json(decorated_client(&db, &updated, user.id).await?))
}

/// DELETE /api/clientes/:id
pub async fn delete(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let user = identity::resolve(&headers, &query, None)?;
    let db = state.stores.for_user(user.id).await?;

    let existing = client::find_by_id(&db.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Cliente {id} não encontrado")))?;
    ownership::ensure_owner(&ownership::resolve_stored_owner(&existing.user_id), user)?;

    let deleted = client::delete(&db, id).await?;
    Ok(Json(deleted))
}
