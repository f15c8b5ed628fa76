//! Response decoration
//!
//! The SPA reads the same logical attribute under several spellings, so
//! every outgoing record is expanded at the serialization boundary: all
//! owner aliases, all completed-flag aliases, plus derived fields
//! (contact status, deduplicated interests, last purchase, nested
//! decorated purchases/contacts). Storage never sees any of this.
//!
//! Every decorator is a pure `Value -> Value` function and idempotent:
//! canonical values are re-derived from whatever spelling is present,
//! then every alias is rewritten from the canonical value, so a second
//! pass reproduces the first.

use chrono::NaiveDate;
use serde_json::{Map, Value, json};

use shared::models::client::dedup_interesses;
use shared::models::contact::{COMPLETED_ALIASES, derive_status};
use shared::models::{Client, Contact, Purchase};
use shared::util::today;

use crate::ownership::{assign_owner, resolve_owner};

/// Read the canonical completed flag from whatever alias is present.
fn resolve_completed(map: &Map<String, Value>) -> bool {
    for key in COMPLETED_ALIASES {
        if let Some(Value::Bool(b)) = map.get(*key) {
            return *b;
        }
    }
    false
}

/// Write the completed flag into every alias spelling.
fn assign_completed(map: &mut Map<String, Value>, completed: bool) {
    for key in COMPLETED_ALIASES {
        map.insert((*key).to_string(), Value::Bool(completed));
    }
}

fn str_field<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    map.get(key).and_then(Value::as_str)
}

/// Decorate a contact wire object.
///
/// Status precedence: explicit `status` field > completed flag > date
/// comparison against `today` > `pending`.
pub fn decorate_contact_value(mut value: Value, fallback_owner: &str, today: NaiveDate) -> Value {
    let owner = resolve_owner(&value, Some(fallback_owner));
    if let Some(map) = value.as_object_mut() {
        let completed = resolve_completed(map);
        let status = derive_status(
            str_field(map, "status"),
            completed,
            str_field(map, "dataContato"),
            today,
        );

        assign_completed(map, completed);
        map.insert("status".to_string(), json!(status.as_str()));
        map.insert("statusLabel".to_string(), json!(status.label_pt()));
    }
    assign_owner(&mut value, &owner);
    value
}

/// Decorate a purchase wire object, including its embedded contacts.
pub fn decorate_purchase_value(mut value: Value, fallback_owner: &str, today: NaiveDate) -> Value {
    let owner = resolve_owner(&value, Some(fallback_owner));

    if let Some(map) = value.as_object_mut()
        && let Some(Value::Array(contatos)) = map.remove("contatos")
    {
        let decorated: Vec<Value> = contatos
            .into_iter()
            .map(|c| decorate_contact_value(c, &owner, today))
            .collect();
        map.insert("contatos".to_string(), Value::Array(decorated));
    }

    assign_owner(&mut value, &owner);
    value
}

/// Decorate a client wire object: owner aliases, cleaned interests,
/// decorated purchases sorted ascending by date, derived `ultimaCompra`.
pub fn decorate_client_value(mut value: Value, fallback_owner: &str, today: NaiveDate) -> Value {
    let owner = resolve_owner(&value, Some(fallback_owner));

    if let Some(map) = value.as_object_mut() {
        let cleaned = match map.get("interesses") {
            Some(Value::Array(raw)) => {
                let tags: Vec<String> = raw
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect();
                Some(dedup_interesses(&tags))
            }
            _ => None,
        };
        if let Some(tags) = cleaned {
            map.insert("interesses".to_string(), json!(tags));
        }

        let mut ultima_compra = Value::Null;
        if let Some(Value::Array(compras)) = map.remove("compras") {
            let mut decorated: Vec<Value> = compras
                .into_iter()
                .map(|p| decorate_purchase_value(p, &owner, today))
                .collect();
            decorated.sort_by(|a, b| {
                let da = a.get("data").and_then(Value::as_str).unwrap_or("");
                let db = b.get("data").and_then(Value::as_str).unwrap_or("");
                da.cmp(db)
            });
            if let Some(last) = decorated
                .iter()
                .filter_map(|p| p.get("data").and_then(Value::as_str))
                .max()
            {
                ultima_compra = json!(last);
            }
            map.insert("compras".to_string(), Value::Array(decorated));
        }
        map.insert("ultimaCompra".to_string(), ultima_compra);
    }

    assign_owner(&mut value, &owner);
    value
}

/// Decorate a stored calendar event.
pub fn decorate_event_value(mut value: Value, fallback_owner: &str) -> Value {
    let owner = resolve_owner(&value, Some(fallback_owner));
    if let Some(map) = value.as_object_mut() {
        let completed = resolve_completed(map);
        assign_completed(map, completed);
    }
    assign_owner(&mut value, &owner);
    value
}

// ── Typed entry points used by handlers ─────────────────────────────

/// Assemble and decorate a full client response from stored records.
pub fn client_response(
    client: &Client,
    purchases: &[(Purchase, Vec<Contact>)],
    fallback_owner: &str,
) -> Value {
    let mut value = serde_json::to_value(client).unwrap_or_else(|_| json!({}));
    let compras: Vec<Value> = purchases
        .iter()
        .map(|(p, contatos)| {
            let mut pv = serde_json::to_value(p).unwrap_or_else(|_| json!({}));
            if let Some(map) = pv.as_object_mut() {
                map.insert("contatos".to_string(), json!(contatos));
            }
            pv
        })
        .collect();
    if let Some(map) = value.as_object_mut() {
        map.insert("compras".to_string(), Value::Array(compras));
    }
    decorate_client_value(value, fallback_owner, today())
}

/// Decorate a stored contact, carrying its owning client's user id.
pub fn contact_response(contact: &Contact, owner: &str) -> Value {
    let value = serde_json::to_value(contact).unwrap_or_else(|_| json!({}));
    decorate_contact_value(value, owner, today())
}

/// Synthetic calendar entry derived from a contact. Never persisted;
/// the `contact-` id prefix keeps it apart from stored events.
pub fn contact_event(contact: &Contact, cliente_nome: Option<&str>, owner: &str) -> Value {
    let titulo = match cliente_nome {
        Some(nome) => format!("Contato pós-venda: {nome}"),
        None => "Contato pós-venda".to_string(),
    };
    let value = json!({
        "id": format!("contact-{}", contact.id),
        "data": contact.data_contato,
        "titulo": titulo,
        "descricao": contact.meses.map(|m| format!("Acompanhamento de {m} meses")),
        "cor": "#f59e0b",
        "tipo": "contato",
        "contatoId": contact.id,
        "compraId": contact.compra_id,
        "clienteId": contact.cliente_id,
        "realizado": contact.realizado,
        "dataContato": contact.data_contato,
    });
    decorate_contact_value(value, owner, today())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::roster;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn contact_decoration_derives_status_and_aliases() {
        let today = day("2024-06-15");
        let raw = json!({
            "id": 3,
            "dataContato": "2024-06-01",
            "realizado": false,
        });
        let v = decorate_contact_value(raw, "renata", today);
        assert_eq!(v["status"], "overdue");
        assert_eq!(v["statusLabel"], "Atrasado");
        for key in COMPLETED_ALIASES {
            assert_eq!(v[*key], false, "alias {key}");
        }
        assert_eq!(v["userId"], "renata");
        assert_eq!(v["responsavel"], "renata");
    }

    #[test]
    fn completed_alias_spelling_is_canonicalized() {
        let today = day("2024-06-15");
        // only the English spelling present, flag true
        let raw = json!({ "id": 1, "completed": true, "dataContato": "2024-01-01" });
        let v = decorate_contact_value(raw, "loja", today);
        assert_eq!(v["realizado"], true);
        assert_eq!(v["status"], "completed");
    }

    #[test]
    fn decoration_is_idempotent() {
        let today = day("2024-06-15");
        let client = json!({
            "id": 1,
            "nome": "Ana",
            "interesses": ["Lentes", "lentes", ""],
            "vendedor": "Marcos",
            "compras": [
                {
                    "id": 2,
                    "data": "2024-03-10",
                    "contatos": [
                        { "id": 5, "dataContato": "2024-06-10", "realizado": false }
                    ]
                },
                { "id": 1, "data": "2023-11-02", "contatos": [] }
            ]
        });

        let once = decorate_client_value(client, roster::DEFAULT_USER_ID, today);
        let twice = decorate_client_value(once.clone(), roster::DEFAULT_USER_ID, today);
        assert_eq!(once, twice);

        // derived fields came out of the first pass
        assert_eq!(once["userId"], "marcos");
        assert_eq!(once["ultimaCompra"], "2024-03-10");
        assert_eq!(once["interesses"], json!(["Lentes"]));
        // purchases sorted ascending by date
        assert_eq!(once["compras"][0]["data"], "2023-11-02");
        assert_eq!(once["compras"][1]["data"], "2024-03-10");
    }

    #[test]
    fn event_decoration_is_idempotent_and_aliases_flags() {
        let raw = json!({ "id": 9, "titulo": "Revisão", "concluido": true, "userId": "cecilia" });
        let once = decorate_event_value(raw, "loja");
        let twice = decorate_event_value(once.clone(), "loja");
        assert_eq!(once, twice);
        assert_eq!(once["realizado"], true);
        assert_eq!(once["completed"], true);
        assert_eq!(once["usuario_id"], "cecilia");
    }

    #[test]
    fn synthetic_contact_event_id_scheme() {
        let contact = Contact {
            id: 12,
            compra_id: 4,
            cliente_id: 2,
            data_contato: "2024-05-01".to_string(),
            data_compra: Some("2024-02-01".to_string()),
            meses: Some(3),
            realizado: false,
            realizado_em: None,
            criado_em: 0,
            atualizado_em: 0,
        };
        let v = contact_event(&contact, Some("Ana"), "renata");
        assert_eq!(v["id"], "contact-12");
        assert_eq!(v["tipo"], "contato");
        assert_eq!(v["data"], "2024-05-01");
        assert_eq!(v["titulo"], "Contato pós-venda: Ana");
        assert_eq!(v["userId"], "renata");
    }
}
