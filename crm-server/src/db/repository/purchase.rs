//! Purchase Repository
//!
//! Purchases never travel alone: they are embedded sub-resources of a
//! client, created and updated through client payloads. A payload entry
//! whose `id` matches an existing purchase of the same client updates in
//! place; anything else is appended with a fresh id. The client's list is
//! read back ascending by date, which keeps the "sorted after every
//! mutation" invariant observable without a separate resort step.

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};

use shared::models::purchase::{Purchase, PurchaseInput, Receita};
use shared::util::now_millis;

use super::{RepoError, RepoResult, contact, next_id};
use crate::utils::time;

const PURCHASE_SELECT: &str = "SELECT id, cliente_id, data, armacao, lente, valor_armacao, \
     valor_lente, nota_fiscal, receita, criado_em, atualizado_em FROM purchases";

/// Map a row by hand; `receita` is a JSON text column.
fn purchase_from_row(row: &SqliteRow) -> RepoResult<Purchase> {
    let receita_raw: Option<String> = row.try_get("receita")?;
    let receita = match receita_raw.as_deref() {
        Some(raw) if !raw.is_empty() => Some(
            serde_json::from_str::<Receita>(raw)
                .map_err(|e| RepoError::Database(format!("Receita corrompida: {e}")))?,
        ),
        _ => None,
    };
    Ok(Purchase {
        id: row.try_get("id")?,
        cliente_id: row.try_get("cliente_id")?,
        data: row.try_get("data")?,
        armacao: row.try_get("armacao")?,
        lente: row.try_get("lente")?,
        valor_armacao: row.try_get("valor_armacao")?,
        valor_lente: row.try_get("valor_lente")?,
        nota_fiscal: row.try_get("nota_fiscal")?,
        receita,
        criado_em: row.try_get("criado_em")?,
        atualizado_em: row.try_get("atualizado_em")?,
    })
}

fn receita_json(receita: &Option<Receita>) -> RepoResult<Option<String>> {
    receita
        .as_ref()
        .map(|r| {
            serde_json::to_string(r)
                .map_err(|e| RepoError::Database(format!("Falha ao serializar receita: {e}")))
        })
        .transpose()
}

/// A client's purchases, ascending by date.
pub async fn list_for_client(pool: &SqlitePool, cliente_id: i64) -> RepoResult<Vec<Purchase>> {
    let sql = format!("{PURCHASE_SELECT} WHERE cliente_id = ? ORDER BY data, id");
    let rows = sqlx::query(&sql).bind(cliente_id).fetch_all(pool).await?;
    rows.iter().map(purchase_from_row).collect()
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Purchase>> {
    let sql = format!("{PURCHASE_SELECT} WHERE id = ?");
    let row = sqlx::query(&sql).bind(id).fetch_optional(pool).await?;
    row.as_ref().map(purchase_from_row).transpose()
}

/// Upsert one purchase payload for a client, inside the client's
/// transaction. Returns the purchase id.
pub(crate) async fn upsert_tx(
    conn: &mut SqliteConnection,
    cliente_id: i64,
    input: &PurchaseInput,
) -> RepoResult<i64> {
    let now = now_millis();
    let receita = receita_json(&input.receita)?;

    let existing: Option<i64> = match input.id {
        Some(id) => {
            sqlx::query_scalar("SELECT id FROM purchases WHERE id = ?1 AND cliente_id = ?2")
                .bind(id)
                .bind(cliente_id)
                .fetch_optional(&mut *conn)
                .await?
        }
        None => None,
    };

    let purchase_id = match existing {
        Some(id) => {
            sqlx::query(
                "UPDATE purchases SET data = ?1, armacao = ?2, lente = ?3, valor_armacao = ?4, \
                 valor_lente = ?5, nota_fiscal = ?6, receita = ?7, atualizado_em = ?8 \
                 WHERE id = ?9",
            )
            .bind(&input.data)
            .bind(&input.armacao)
            .bind(&input.lente)
            .bind(input.valor_armacao)
            .bind(input.valor_lente)
            .bind(&input.nota_fiscal)
            .bind(&receita)
            .bind(now)
            .bind(id)
            .execute(&mut *conn)
            .await?;
            id
        }
        None => {
            // Unknown ids are not trusted; appended purchases always get
            // a store-generated id.
            let id = next_id(conn, "purchase").await?;
            sqlx::query(
                "INSERT INTO purchases (id, cliente_id, data, armacao, lente, valor_armacao, \
                 valor_lente, nota_fiscal, receita, criado_em, atualizado_em) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)",
            )
            .bind(id)
            .bind(cliente_id)
            .bind(&input.data)
            .bind(&input.armacao)
            .bind(&input.lente)
            .bind(input.valor_armacao)
            .bind(input.valor_lente)
            .bind(&input.nota_fiscal)
            .bind(&receita)
            .bind(now)
            .execute(&mut *conn)
            .await?;
            id
        }
    };

    if let Some(contatos) = &input.contatos {
        contact::delete_for_purchase_tx(conn, purchase_id).await?;
        let purchase_date = time::parse_date(&input.data)
            .map_err(|_| RepoError::Validation(format!("Data de compra inválida: {}", input.data)))?;
        for c in contatos {
            let data_contato = match (&c.data_contato, c.meses) {
                (Some(explicit), _) => explicit.clone(),
                (None, Some(meses)) => time::format_date(time::add_months(purchase_date, meses)),
                (None, None) => {
                    return Err(RepoError::Validation(
                        "Contato precisa de dataContato ou meses".to_string(),
                    ));
                }
            };
            contact::create_tx(
                conn,
                purchase_id,
                cliente_id,
                &data_contato,
                Some(&input.data),
                c.meses,
                c.realizado,
            )
            .await?;
        }
    }

    Ok(purchase_id)
}
