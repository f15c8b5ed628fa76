//! Static user roster
//!
//! The store operates with a fixed team; there is no signup flow. Every
//! request must resolve to one of these entries. `loja` is the shared
//! counter identity and the fallback owner for orphaned records.

use shared::models::{AccessLevel, Role, User};
use shared::util::normalize_user_key;

/// Fallback user for empty identifiers and unresolvable record owners.
pub const DEFAULT_USER_ID: &str = "loja";

/// The roster. Defined at process start, immutable.
pub static USERS: &[User] = &[
    User {
        id: "loja",
        nome: "Loja",
        nivel: AccessLevel::Total,
        papel: Role::Balcao,
    },
    User {
        id: "renata",
        nome: "Renata",
        nivel: AccessLevel::Total,
        papel: Role::Gerente,
    },
    User {
        id: "marcos",
        nome: "Marcos",
        nivel: AccessLevel::Padrao,
        papel: Role::Vendedor,
    },
    User {
        id: "joao-victor",
        nome: "João Víctor",
        nivel: AccessLevel::Padrao,
        papel: Role::Vendedor,
    },
    User {
        id: "cecilia",
        nome: "Cecília",
        nivel: AccessLevel::Padrao,
        papel: Role::Vendedor,
    },
];

/// Look up a roster entry by an already-normalized id.
pub fn find_by_id(normalized: &str) -> Option<&'static User> {
    USERS.iter().find(|u| u.id == normalized)
}

/// Normalize a raw candidate and look it up in one step.
pub fn find_by_raw(raw: &str) -> Option<&'static User> {
    let key = normalize_user_key(raw);
    if key.is_empty() {
        return None;
    }
    find_by_id(&key)
}

/// The default user entry. The roster always contains it.
pub fn default_user() -> &'static User {
    find_by_id(DEFAULT_USER_ID).expect("roster must contain the default user")
}
