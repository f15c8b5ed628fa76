//! Client Repository
//!
//! Mutations take the store's write lock for their whole
//! check-then-write sequence; reads go straight to the pool.

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};

use shared::models::client::{Client, ClientCreate, ClientUpdate, dedup_interesses};
use shared::util::{digits_only, now_millis};

use super::{RepoError, RepoResult, next_id, purchase};
use crate::db::DbService;

const CLIENT_SELECT: &str = "SELECT id, nome, telefone, email, cpf, genero, data_nascimento, \
     aceita_contato, tipo_cliente, etapa, interesses, user_id, criado_em, atualizado_em \
     FROM clients";

/// Map a row by hand; `interesses` is a JSON text column.
fn client_from_row(row: &SqliteRow) -> RepoResult<Client> {
    let interesses_raw: String = row.try_get("interesses")?;
    let interesses: Vec<String> = serde_json::from_str(&interesses_raw).unwrap_or_default();
    Ok(Client {
        id: row.try_get("id")?,
        nome: row.try_get("nome")?,
        telefone: row.try_get("telefone")?,
        email: row.try_get("email")?,
        cpf: row.try_get("cpf")?,
        genero: row.try_get("genero")?,
        data_nascimento: row.try_get("data_nascimento")?,
        aceita_contato: row.try_get("aceita_contato")?,
        tipo_cliente: row.try_get("tipo_cliente")?,
        etapa: row.try_get("etapa")?,
        interesses,
        user_id: row.try_get("user_id")?,
        criado_em: row.try_get("criado_em")?,
        atualizado_em: row.try_get("atualizado_em")?,
    })
}

fn interesses_json(interesses: &[String]) -> String {
    serde_json::to_string(interesses).unwrap_or_else(|_| "[]".to_string())
}

/// Substring search over name/email/phone, newest-id-first. Pagination
/// happens at the API layer, after the per-record ownership filter, so
/// foreign rows never count toward page totals.
pub async fn search(pool: &SqlitePool, q: Option<&str>) -> RepoResult<Vec<Client>> {
    let query = q.map(str::trim).filter(|s| !s.is_empty());
    let rows = match query {
        Some(q) => {
            let pattern = format!("%{q}%");
            let sql = format!(
                "{CLIENT_SELECT} WHERE nome LIKE ?1 OR email LIKE ?1 OR telefone LIKE ?1 \
                 ORDER BY id DESC"
            );
            sqlx::query(&sql).bind(&pattern).fetch_all(pool).await?
        }
        None => {
            let sql = format!("{CLIENT_SELECT} ORDER BY id DESC");
            sqlx::query(&sql).fetch_all(pool).await?
        }
    };
    rows.iter().map(client_from_row).collect()
}

/// id → (nome, user_id) for every client; used when contact and event
/// listings re-derive ownership and label synthetic entries.
pub async fn brief_map(
    pool: &SqlitePool,
) -> RepoResult<std::collections::HashMap<i64, (String, String)>> {
    let rows = sqlx::query("SELECT id, nome, user_id FROM clients")
        .fetch_all(pool)
        .await?;
    let mut map = std::collections::HashMap::new();
    for row in &rows {
        let id: i64 = row.try_get("id")?;
        let nome: String = row.try_get("nome")?;
        let user_id: String = row.try_get("user_id")?;
        map.insert(id, (nome, user_id));
    }
    Ok(map)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Client>> {
    let sql = format!("{CLIENT_SELECT} WHERE id = ?");
    let row = sqlx::query(&sql).bind(id).fetch_optional(pool).await?;
    row.as_ref().map(client_from_row).transpose()
}

async fn find_by_id_tx(conn: &mut SqliteConnection, id: i64) -> RepoResult<Option<Client>> {
    let sql = format!("{CLIENT_SELECT} WHERE id = ?");
    let row = sqlx::query(&sql).bind(id).fetch_optional(&mut *conn).await?;
    row.as_ref().map(client_from_row).transpose()
}

/// CPF uniqueness: digits-only comparison across the store, excluding the
/// record under update. Blank CPFs are never conflicts.
async fn check_cpf_unique(
    conn: &mut SqliteConnection,
    cpf: Option<&str>,
    exclude_id: Option<i64>,
) -> RepoResult<Option<String>> {
    let digits = cpf.map(digits_only).filter(|d| !d.is_empty());
    if let Some(d) = &digits {
        let holder: Option<i64> = sqlx::query_scalar(
            "SELECT id FROM clients WHERE cpf_digits = ?1 AND id != ?2 LIMIT 1",
        )
        .bind(d)
        .bind(exclude_id.unwrap_or(-1))
        .fetch_optional(&mut *conn)
        .await?;
        if holder.is_some() {
            return Err(RepoError::Duplicate(format!(
                "CPF já cadastrado para outro cliente ({d})"
            )));
        }
    }
    Ok(digits)
}

pub async fn create(db: &DbService, data: ClientCreate, user_id: &str) -> RepoResult<Client> {
    let _guard = db.write_lock.lock().await;
    let now = now_millis();
    let interesses = dedup_interesses(&data.interesses);

    let mut tx = db.pool.begin().await?;
    let cpf_digits = check_cpf_unique(&mut tx, data.cpf.as_deref(), None).await?;
    let id = next_id(&mut tx, "client").await?;

    sqlx::query(
        "INSERT INTO clients (id, nome, telefone, email, cpf, cpf_digits, genero, \
         data_nascimento, aceita_contato, tipo_cliente, etapa, interesses, user_id, \
         criado_em, atualizado_em) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?14)",
    )
    .bind(id)
    .bind(&data.nome)
    .bind(&data.telefone)
    .bind(&data.email)
    .bind(&data.cpf)
    .bind(&cpf_digits)
    .bind(&data.genero)
    .bind(&data.data_nascimento)
    .bind(data.aceita_contato)
    .bind(&data.tipo_cliente)
    .bind(&data.etapa)
    .bind(interesses_json(&interesses))
    .bind(user_id)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    for compra in &data.compras {
        purchase::upsert_tx(&mut tx, id, compra).await?;
    }

    tx.commit().await?;

    find_by_id(&db.pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Falha ao criar cliente".into()))
}

pub async fn update(db: &DbService, id: i64, data: ClientUpdate) -> RepoResult<Client> {
    let _guard = db.write_lock.lock().await;
    let now = now_millis();

    let mut tx = db.pool.begin().await?;
    let existing = find_by_id_tx(&mut tx, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Cliente {id} não encontrado")))?;

    // Merge patch semantics: absent keeps, null clears, value replaces.
    let nome = match data.nome {
        None => existing.nome,
        Some(Some(v)) => v,
        Some(None) => {
            return Err(RepoError::Validation("nome não pode ser nulo".to_string()));
        }
    };
    let telefone = data.telefone.unwrap_or(existing.telefone);
    let email = data.email.unwrap_or(existing.email);
    let cpf = data.cpf.unwrap_or(existing.cpf);
    let genero = data.genero.unwrap_or(existing.genero);
    let data_nascimento = data.data_nascimento.unwrap_or(existing.data_nascimento);
    let aceita_contato = match data.aceita_contato {
        None => existing.aceita_contato,
        Some(v) => v.unwrap_or(false),
    };
    let tipo_cliente = data.tipo_cliente.unwrap_or(existing.tipo_cliente);
    let etapa = data.etapa.unwrap_or(existing.etapa);
    let interesses = match data.interesses {
        None => existing.interesses,
        Some(None) => Vec::new(),
        Some(Some(raw)) => dedup_interesses(&raw),
    };

    let cpf_digits = check_cpf_unique(&mut tx, cpf.as_deref(), Some(id)).await?;

    sqlx::query(
        "UPDATE clients SET nome = ?1, telefone = ?2, email = ?3, cpf = ?4, cpf_digits = ?5, \
         genero = ?6, data_nascimento = ?7, aceita_contato = ?8, tipo_cliente = ?9, \
         etapa = ?10, interesses = ?11, atualizado_em = ?12 WHERE id = ?13",
    )
    .bind(&nome)
    .bind(&telefone)
    .bind(&email)
    .bind(&cpf)
    .bind(&cpf_digits)
    .bind(&genero)
    .bind(&data_nascimento)
    .bind(aceita_contato)
    .bind(&tipo_cliente)
    .bind(&etapa)
    .bind(interesses_json(&interesses))
    .bind(now)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    if let Some(compras) = &data.compras {
        for compra in compras {
            purchase::upsert_tx(&mut tx, id, compra).await?;
        }
    }

    tx.commit().await?;

    find_by_id(&db.pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Cliente {id} não encontrado")))
}

/// Delete a client; purchases and contacts cascade.
pub async fn delete(db: &DbService, id: i64) -> RepoResult<bool> {
    let _guard = db.write_lock.lock().await;
    let rows = sqlx::query("DELETE FROM clients WHERE id = ?")
        .bind(id)
        .execute(&db.pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
