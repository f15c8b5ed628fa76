//! Contact Repository
//!
//! Contacts are created alongside their purchase and mutated only through
//! the completion flag; everything else about them is immutable history.

use sqlx::{SqliteConnection, SqlitePool};

use shared::models::Contact;
use shared::util::now_millis;

use super::{RepoError, RepoResult, next_id};
use crate::db::DbService;

const CONTACT_SELECT: &str = "SELECT id, compra_id, cliente_id, data_contato, data_compra, \
     meses, realizado, realizado_em, criado_em, atualizado_em FROM contacts";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Contact>> {
    let sql = format!("{CONTACT_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Contact>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// All contacts scheduled up to `until` (inclusive), soonest first.
/// Without a bound, the whole follow-up agenda.
pub async fn list_upcoming(pool: &SqlitePool, until: Option<&str>) -> RepoResult<Vec<Contact>> {
    let rows = match until {
        Some(limit) => {
            let sql =
                format!("{CONTACT_SELECT} WHERE data_contato <= ? ORDER BY data_contato, id");
            sqlx::query_as::<_, Contact>(&sql)
                .bind(limit)
                .fetch_all(pool)
                .await?
        }
        None => {
            let sql = format!("{CONTACT_SELECT} ORDER BY data_contato, id");
            sqlx::query_as::<_, Contact>(&sql).fetch_all(pool).await?
        }
    };
    Ok(rows)
}

/// Contacts whose scheduled date falls inside the inclusive range.
/// ISO dates compare correctly as text.
pub async fn list_in_range(pool: &SqlitePool, from: &str, to: &str) -> RepoResult<Vec<Contact>> {
    let sql = format!(
        "{CONTACT_SELECT} WHERE data_contato >= ?1 AND data_contato <= ?2 \
         ORDER BY data_contato, id"
    );
    let rows = sqlx::query_as::<_, Contact>(&sql)
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn list_for_purchase(pool: &SqlitePool, compra_id: i64) -> RepoResult<Vec<Contact>> {
    let sql = format!("{CONTACT_SELECT} WHERE compra_id = ? ORDER BY data_contato, id");
    let rows = sqlx::query_as::<_, Contact>(&sql)
        .bind(compra_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Create a contact inside the purchase's transaction.
pub(crate) async fn create_tx(
    conn: &mut SqliteConnection,
    compra_id: i64,
    cliente_id: i64,
    data_contato: &str,
    data_compra: Option<&str>,
    meses: Option<i64>,
    realizado: bool,
) -> RepoResult<i64> {
    let now = now_millis();
    let id = next_id(conn, "contact").await?;
    let realizado_em = realizado.then(now_millis);
    sqlx::query(
        "INSERT INTO contacts (id, compra_id, cliente_id, data_contato, data_compra, meses, \
         realizado, realizado_em, criado_em, atualizado_em) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)",
    )
    .bind(id)
    .bind(compra_id)
    .bind(cliente_id)
    .bind(data_contato)
    .bind(data_compra)
    .bind(meses)
    .bind(realizado)
    .bind(realizado_em)
    .bind(now)
    .execute(&mut *conn)
    .await?;
    Ok(id)
}

/// Drop a purchase's contacts (used when a purchase update replaces them).
pub(crate) async fn delete_for_purchase_tx(
    conn: &mut SqliteConnection,
    compra_id: i64,
) -> RepoResult<()> {
    sqlx::query("DELETE FROM contacts WHERE compra_id = ?")
        .bind(compra_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Flip the completion flag. Sets the completion timestamp when turning
/// true, clears it when turning back false.
pub async fn set_realizado(db: &DbService, id: i64, realizado: bool) -> RepoResult<Contact> {
    let _guard = db.write_lock.lock().await;
    let now = now_millis();
    let realizado_em = realizado.then_some(now);
    let rows = sqlx::query(
        "UPDATE contacts SET realizado = ?1, realizado_em = ?2, atualizado_em = ?3 WHERE id = ?4",
    )
    .bind(realizado)
    .bind(realizado_em)
    .bind(now)
    .bind(id)
    .execute(&db.pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Contato {id} não encontrado")));
    }
    find_by_id(&db.pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Contato {id} não encontrado")))
}
