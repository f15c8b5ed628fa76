//! Client API integration tests: CPF uniqueness per user store, pagination,
//! null-vs-absent partial updates, purchase upsert, ownership enforcement.

mod common;

use common::{delete, get, post, put};
use http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn cpf_conflict_within_one_store_but_not_across_users() {
    let tmp = tempfile::tempdir().unwrap();
    let app = common::test_app(tmp.path());

    let (status, body) = post(
        &app,
        "/api/clientes",
        Some("renata"),
        json!({ "nome": "Ana", "cpf": "123.456.789-00" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["nome"], "Ana");
    assert_eq!(body["userId"], "renata");

    // digit-equivalent CPF under the same user: conflict
    let (status, body) = post(
        &app,
        "/api/clientes",
        Some("renata"),
        json!({ "nome": "Ana2", "cpf": "12345678900" }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");

    // same payload in another user's store: fine
    let (status, _) = post(
        &app,
        "/api/clientes",
        Some("marcos"),
        json!({ "nome": "Ana2", "cpf": "12345678900" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn listing_paginates_at_ten_and_searches() {
    let tmp = tempfile::tempdir().unwrap();
    let app = common::test_app(tmp.path());

    for i in 0..12 {
        let (status, _) = post(
            &app,
            "/api/clientes",
            Some("renata"),
            json!({ "nome": format!("Cliente {i:02}"), "telefone": format!("11 9000-00{i:02}") }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = get(&app, "/api/clientes", Some("renata")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], 1);
    assert_eq!(body["pageSize"], 10);
    assert_eq!(body["total"], 12);
    assert_eq!(body["totalPages"], 2);
    assert_eq!(body["items"].as_array().unwrap().len(), 10);
    // newest first
    assert_eq!(body["items"][0]["nome"], "Cliente 11");

    let (_, body) = get(&app, "/api/clientes?page=2", Some("renata")).await;
    assert_eq!(body["items"].as_array().unwrap().len(), 2);

    // substring search over nome/telefone
    let (_, body) = get(&app, "/api/clientes?q=Cliente%2003", Some("renata")).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["nome"], "Cliente 03");

    // another user sees an empty table
    let (_, body) = get(&app, "/api/clientes", Some("marcos")).await;
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn partial_update_keeps_absent_and_clears_null() {
    let tmp = tempfile::tempdir().unwrap();
    let app = common::test_app(tmp.path());

    let (_, created) = post(
        &app,
        "/api/clientes",
        Some("renata"),
        json!({ "nome": "Bruna", "telefone": "11 91234-5678", "email": "bruna@mail.com" }),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    // email changes, telefone absent from the payload stays put
    let (status, body) = put(
        &app,
        &format!("/api/clientes/{id}"),
        Some("renata"),
        json!({ "email": "bruna@otica.com" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "bruna@otica.com");
    assert_eq!(body["telefone"], "11 91234-5678");

    // explicit null clears the same field
    let (status, body) = put(
        &app,
        &format!("/api/clientes/{id}"),
        Some("renata"),
        json!({ "telefone": null }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["telefone"], json!(null));
    assert_eq!(body["email"], "bruna@otica.com");

    // nome cannot be nulled
    let (status, body) = put(
        &app,
        &format!("/api/clientes/{id}"),
        Some("renata"),
        json!({ "nome": null }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION");
}

#[tokio::test]
async fn purchases_upsert_by_id_and_stay_sorted() {
    let tmp = tempfile::tempdir().unwrap();
    let app = common::test_app(tmp.path());

    let (_, created) = post(
        &app,
        "/api/clientes",
        Some("renata"),
        json!({
            "nome": "Carla",
            "compras": [
                { "data": "2024-05-20", "armacao": "Modelo B" },
                { "data": "2023-11-02", "armacao": "Modelo A" }
            ]
        }),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    // ascending by date regardless of payload order, last purchase = max
    let compras = created["compras"].as_array().unwrap();
    assert_eq!(compras.len(), 2);
    assert_eq!(compras[0]["data"], "2023-11-02");
    assert_eq!(compras[1]["data"], "2024-05-20");
    assert_eq!(created["ultimaCompra"], "2024-05-20");

    let first_id = compras[1]["id"].as_i64().unwrap();

    // id match updates in place; no id appends
    let (status, body) = put(
        &app,
        &format!("/api/clientes/{id}"),
        Some("renata"),
        json!({
            "compras": [
                { "id": first_id, "data": "2024-06-01", "armacao": "Modelo B2" },
                { "data": "2024-01-15", "armacao": "Modelo C" }
            ]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let compras = body["compras"].as_array().unwrap();
    assert_eq!(compras.len(), 3);
    assert_eq!(compras[0]["data"], "2023-11-02");
    assert_eq!(compras[1]["data"], "2024-01-15");
    assert_eq!(compras[2]["data"], "2024-06-01");
    assert_eq!(compras[2]["id"], first_id);
    assert_eq!(compras[2]["armacao"], "Modelo B2");
    assert_eq!(body["ultimaCompra"], "2024-06-01");
}

#[tokio::test]
async fn foreign_owned_rows_are_hidden_and_protected() {
    let tmp = tempfile::tempdir().unwrap();
    let app = common::test_app(tmp.path());

    // payload alias assigns the record to another user even though it
    // lands in renata's store
    let (status, created) = post(
        &app,
        "/api/clientes",
        Some("renata"),
        json!({ "nome": "Registro alheio", "responsavel": "marcos" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["userId"], "marcos");
    let id = created["id"].as_i64().unwrap();

    // hidden from renata's listing
    let (_, body) = get(&app, "/api/clientes", Some("renata")).await;
    assert_eq!(body["total"], 0);

    // and shielded from renata's mutations
    let (status, body) = put(
        &app,
        &format!("/api/clientes/{id}"),
        Some("renata"),
        json!({ "etapa": "ativo" }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "NOT_AUTHORIZED");

    let (status, _) = delete(&app, &format!("/api/clientes/{id}"), Some("renata")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn identity_and_validation_errors() {
    let tmp = tempfile::tempdir().unwrap();
    let app = common::test_app(tmp.path());

    // no identity candidate anywhere: 400
    let (status, body) = post(&app, "/api/clientes", None, json!({ "nome": "Ana" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "NOT_AUTHENTICATED");

    // candidate supplied but unknown: 403
    let (status, body) = post(
        &app,
        "/api/clientes",
        Some("intruso"),
        json!({ "nome": "Ana" }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "NOT_AUTHORIZED");

    // identity via body alias alone works
    let (status, _) = post(
        &app,
        "/api/clientes",
        None,
        json!({ "nome": "Ana", "usuario_id": "renata" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // schema violations stop before storage
    let (status, body) = post(&app, "/api/clientes", Some("renata"), json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION");

    let (status, _) = post(
        &app,
        "/api/clientes",
        Some("renata"),
        json!({ "nome": "  " }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // missing record is 404
    let (status, body) = get(&app, "/api/clientes/999", Some("renata")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn health_reports_storage_backend() {
    let tmp = tempfile::tempdir().unwrap();
    let app = common::test_app(tmp.path());

    let (status, body) = get(&app, "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "file");
}

#[tokio::test]
async fn spreadsheet_export_unconfigured_is_503_with_missing_list() {
    let tmp = tempfile::tempdir().unwrap();
    let app = common::test_app(tmp.path());

    let (status, body) = post(&app, "/api/planilha/exportar", Some("renata"), json!({})).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "NOT_CONFIGURED");
    let missing = body["details"]["missing"].as_array().unwrap();
    assert!(missing.contains(&json!("SHEETS_API_URL")));
    assert!(missing.contains(&json!("SHEETS_SPREADSHEET_ID")));
    assert!(missing.contains(&json!("SHEETS_API_TOKEN")));
}
