//! Ownership / ACL layer
//!
//! Records store one canonical `user_id`, but payloads and legacy exports
//! may carry the owner under more than a dozen spellings. Resolution scans
//! the alias list in a fixed order; assignment writes the canonical id back
//! into every alias so any consumer, whichever key it reads, sees the same
//! value.
//!
//! Unresolvable owners fall back to the supplied fallback and ultimately to
//! the default user. This leniency silently adopts orphaned/legacy records
//! instead of rejecting them; the SPA depends on it.

use serde_json::Value;

use shared::error::{AppError, AppResult};
use shared::models::User;
use shared::util::normalize_user_key;

use crate::identity::roster;

/// Owner alias spellings, in resolution order. The first present field
/// whose value normalizes to a roster user wins.
pub const OWNER_ALIASES: &[&str] = &[
    "userId",
    "user_id",
    "usuarioId",
    "usuario_id",
    "usuario",
    "ownerId",
    "owner_id",
    "owner",
    "responsavel",
    "responsavelId",
    "responsavel_id",
    "vendedor",
    "vendedorId",
    "vendedor_id",
    "atendente",
    "consultor",
];

fn candidate_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Resolve the owning user of a wire object.
///
/// Scans [`OWNER_ALIASES`] in order; falls back to the normalized
/// `fallback`, then to the default user.
pub fn resolve_owner(entity: &Value, fallback: Option<&str>) -> String {
    if let Value::Object(map) = entity {
        for key in OWNER_ALIASES {
            if let Some(raw) = map.get(*key).and_then(|v| candidate_from_value(v))
                && let Some(user) = roster::find_by_raw(&raw)
            {
                return user.id.to_string();
            }
        }
    }
    resolve_stored_owner(fallback.unwrap_or(""))
}

/// Resolve the owner of a stored record from its canonical `user_id`
/// column. Stale or foreign values that do not normalize to a roster
/// entry fall back to the default user.
pub fn resolve_stored_owner(stored: &str) -> String {
    let key = normalize_user_key(stored);
    if key.is_empty() {
        return roster::DEFAULT_USER_ID.to_string();
    }
    match roster::find_by_id(&key) {
        Some(user) => user.id.to_string(),
        None => roster::DEFAULT_USER_ID.to_string(),
    }
}

/// Write the canonical owner id into every alias field of a wire object.
pub fn assign_owner(entity: &mut Value, user_id: &str) {
    if let Value::Object(map) = entity {
        for key in OWNER_ALIASES {
            map.insert((*key).to_string(), Value::String(user_id.to_string()));
        }
    }
}

/// Reject the request unless the record's resolved owner is the requester.
pub fn ensure_owner(record_owner: &str, requester: &User) -> AppResult<()> {
    if record_owner == requester.id {
        Ok(())
    } else {
        Err(AppError::forbidden("Registro pertence a outro usuário"))
    }
}
