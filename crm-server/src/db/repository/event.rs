//! Event Repository
//!
//! Only stored calendar events live here. Synthetic contact events are
//! assembled by the decorator at read time and never persisted.

use sqlx::SqlitePool;

use shared::models::event::{Event, EventCreate, EventUpdate};
use shared::util::now_millis;

use super::{RepoError, RepoResult, next_id};
use crate::db::DbService;

const EVENT_SELECT: &str = "SELECT id, data, titulo, descricao, cor, cliente_id, concluido, \
     user_id, criado_em, atualizado_em FROM events";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Event>> {
    let sql = format!("{EVENT_SELECT} ORDER BY id DESC");
    let rows = sqlx::query_as::<_, Event>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

/// Events inside the inclusive date range, soonest first.
pub async fn find_in_range(pool: &SqlitePool, from: &str, to: &str) -> RepoResult<Vec<Event>> {
    let sql = format!("{EVENT_SELECT} WHERE data >= ?1 AND data <= ?2 ORDER BY data, id");
    let rows = sqlx::query_as::<_, Event>(&sql)
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Event>> {
    let sql = format!("{EVENT_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Event>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(db: &DbService, data: EventCreate, user_id: &str) -> RepoResult<Event> {
    let _guard = db.write_lock.lock().await;
    let now = now_millis();

    let mut tx = db.pool.begin().await?;
    let id = next_id(&mut tx, "event").await?;
    sqlx::query(
        "INSERT INTO events (id, data, titulo, descricao, cor, cliente_id, concluido, user_id, \
         criado_em, atualizado_em) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)",
    )
    .bind(id)
    .bind(&data.data)
    .bind(&data.titulo)
    .bind(&data.descricao)
    .bind(&data.cor)
    .bind(data.cliente_id)
    .bind(data.concluido)
    .bind(user_id)
    .bind(now)
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;

    find_by_id(&db.pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Falha ao criar evento".into()))
}

pub async fn update(db: &DbService, id: i64, data: EventUpdate) -> RepoResult<Event> {
    let _guard = db.write_lock.lock().await;
    let now = now_millis();

    let existing = find_by_id(&db.pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Evento {id} não encontrado")))?;

    // Merge patch semantics: absent keeps, null clears, value replaces.
    let data_field = match data.data {
        None => existing.data,
        Some(Some(v)) => v,
        Some(None) => {
            return Err(RepoError::Validation("data não pode ser nula".to_string()));
        }
    };
    let titulo = match data.titulo {
        None => existing.titulo,
        Some(Some(v)) => v,
        Some(None) => {
            return Err(RepoError::Validation("titulo não pode ser nulo".to_string()));
        }
    };
    let descricao = data.descricao.unwrap_or(existing.descricao);
    let cor = data.cor.unwrap_or(existing.cor);
    let cliente_id = data.cliente_id.unwrap_or(existing.cliente_id);
    let concluido = match data.concluido {
        None => existing.concluido,
        Some(v) => v.unwrap_or(false),
    };

    sqlx::query(
        "UPDATE events SET data = ?1, titulo = ?2, descricao = ?3, cor = ?4, cliente_id = ?5, \
         concluido = ?6, atualizado_em = ?7 WHERE id = ?8",
    )
    .bind(&data_field)
    .bind(&titulo)
    .bind(&descricao)
    .bind(&cor)
    .bind(cliente_id)
    .bind(concluido)
    .bind(now)
    .bind(id)
    .execute(&db.pool)
    .await?;

    find_by_id(&db.pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Evento {id} não encontrado")))
}

pub async fn delete(db: &DbService, id: i64) -> RepoResult<bool> {
    let _guard = db.write_lock.lock().await;
    let rows = sqlx::query("DELETE FROM events WHERE id = ?")
        .bind(id)
        .execute(&db.pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
