//! User roster handlers

use axum::Json;

use shared::models::User;

use crate::identity::roster;

/// GET /api/usuarios - the fixed roster
pub async fn list() -> Json<Vec<User>> {
    Json(roster::USERS.to_vec())
}
