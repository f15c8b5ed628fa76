//! Identity resolution
//!
//! Every request carries a user identifier somewhere: a header, a query
//! parameter, or a body field, under any of the spellings the SPA has
//! accumulated over time. The resolver scans a fixed precedence order
//! (headers, then query, then body; within each, the listed key order)
//! and the first candidate that normalizes to a roster entry wins.
//!
//! No non-empty candidate at all → 400 `NOT_AUTHENTICATED`.
//! Candidates present but none resolvable → 403 `NOT_AUTHORIZED`.

pub mod roster;

use std::collections::HashMap;

use axum::http::HeaderMap;
use serde_json::Value;

use shared::error::{AppError, AppResult};
use shared::models::User;

/// Header spellings, in precedence order.
pub const IDENTITY_HEADER_KEYS: &[&str] = &[
    "x-user-id",
    "x-usuario-id",
    "x-usuario",
    "x-owner-id",
    "x-responsavel",
];

/// Query/body spellings, in precedence order.
pub const IDENTITY_PARAM_KEYS: &[&str] = &[
    "userId",
    "user_id",
    "usuarioId",
    "usuario_id",
    "usuario",
    "responsavel",
    "responsavelId",
    "responsavel_id",
    "ownerId",
    "owner_id",
    "owner",
    "vendedor",
    "vendedorId",
    "atendente",
    "consultor",
    "user",
    "uid",
];

/// Pull a usable string out of a loosely-typed body value.
fn candidate_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Resolve the requesting user from header, query and (optionally) body
/// candidates. The body is the raw JSON payload when the route has one.
pub fn resolve(
    headers: &HeaderMap,
    query: &HashMap<String, String>,
    body: Option<&Value>,
) -> AppResult<&'static User> {
    let mut saw_candidate = false;

    for key in IDENTITY_HEADER_KEYS {
        if let Some(raw) = headers.get(*key).and_then(|v| v.to_str().ok())
            && !raw.trim().is_empty()
        {
            saw_candidate = true;
            if let Some(user) = roster::find_by_raw(raw) {
                return Ok(user);
            }
        }
    }

    for key in IDENTITY_PARAM_KEYS {
        if let Some(raw) = query.get(*key)
            && !raw.trim().is_empty()
        {
            saw_candidate = true;
            if let Some(user) = roster::find_by_raw(raw) {
                return Ok(user);
            }
        }
    }

    if let Some(Value::Object(map)) = body {
        for key in IDENTITY_PARAM_KEYS {
            if let Some(raw) = map.get(*key).and_then(candidate_from_value)
                && !raw.trim().is_empty()
            {
                saw_candidate = true;
                if let Some(user) = roster::find_by_raw(&raw) {
                    return Ok(user);
                }
            }
        }
    }

    if saw_candidate {
        Err(AppError::forbidden(
            "Usuário informado não consta no cadastro".to_string(),
        ))
    } else {
        Err(AppError::NotAuthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use serde_json::json;

    fn empty_query() -> HashMap<String, String> {
        HashMap::new()
    }

    #[test]
    fn header_spellings_resolve() {
        for key in IDENTITY_HEADER_KEYS {
            let mut headers = HeaderMap::new();
            headers.insert(*key, HeaderValue::from_static("Renata"));
            let user = resolve(&headers, &empty_query(), None).unwrap();
            assert_eq!(user.id, "renata", "header {key}");
        }
    }

    #[test]
    fn query_and_body_spellings_resolve() {
        for key in IDENTITY_PARAM_KEYS {
            let mut query = HashMap::new();
            query.insert((*key).to_string(), "João Víctor".to_string());
            let user = resolve(&HeaderMap::new(), &query, None).unwrap();
            assert_eq!(user.id, "joao-victor", "query {key}");

            let body = json!({ *key: "MARCOS" });
            let user = resolve(&HeaderMap::new(), &empty_query(), Some(&body)).unwrap();
            assert_eq!(user.id, "marcos", "body {key}");
        }
    }

    #[test]
    fn headers_take_precedence_over_query_and_body() {
        let mut headers = HeaderMap::new();
        headers.insert("x-user-id", HeaderValue::from_static("renata"));
        let mut query = HashMap::new();
        query.insert("userId".to_string(), "marcos".to_string());
        let body = json!({ "usuario": "cecilia" });

        let user = resolve(&headers, &query, Some(&body)).unwrap();
        assert_eq!(user.id, "renata");
    }

    #[test]
    fn numeric_body_candidate_counts_as_supplied() {
        let body = json!({ "userId": 42 });
        let err = resolve(&HeaderMap::new(), &empty_query(), Some(&body)).unwrap_err();
        assert_eq!(err.code(), "NOT_AUTHORIZED");
    }

    #[test]
    fn no_candidate_is_not_authenticated() {
        let err = resolve(&HeaderMap::new(), &empty_query(), None).unwrap_err();
        assert_eq!(err.code(), "NOT_AUTHENTICATED");

        // blank values do not count as candidates
        let mut query = HashMap::new();
        query.insert("userId".to_string(), "   ".to_string());
        let err = resolve(&HeaderMap::new(), &query, None).unwrap_err();
        assert_eq!(err.code(), "NOT_AUTHENTICATED");
    }

    #[test]
    fn unknown_candidate_is_not_authorized() {
        let mut headers = HeaderMap::new();
        headers.insert("x-user-id", HeaderValue::from_static("intruso"));
        let err = resolve(&headers, &empty_query(), None).unwrap_err();
        assert_eq!(err.code(), "NOT_AUTHORIZED");
    }
}
