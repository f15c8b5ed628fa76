//! Event API integration tests: range validation, synthetic contact
//! events, cross-tenant isolation, client references, partial updates.

mod common;

use common::{delete, get, post, put};
use http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn range_params_are_validated() {
    let tmp = tempfile::tempdir().unwrap();
    let app = common::test_app(tmp.path());

    let (status, body) = get(
        &app,
        "/api/eventos?from=2024-02-01&to=2024-01-01",
        Some("renata"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION");

    let (status, _) = get(&app, "/api/eventos?from=2024-01-01", Some("renata")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get(
        &app,
        "/api/eventos?from=01/01/2024&to=2024-01-31",
        Some("renata"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn range_merges_synthetic_contact_events_and_filters_foreign_rows() {
    let tmp = tempfile::tempdir().unwrap();
    let app = common::test_app(tmp.path());

    // stored event inside the range
    let (status, _) = post(
        &app,
        "/api/eventos",
        Some("renata"),
        json!({ "data": "2024-01-10", "titulo": "Campanha de janeiro" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // purchase on 2023-10-05 + 3 months → contact on 2024-01-05
    let (_, created) = post(
        &app,
        "/api/clientes",
        Some("renata"),
        json!({
            "nome": "Fernanda",
            "compras": [{ "data": "2023-10-05", "contatos": [ { "meses": 3 } ] }]
        }),
    )
    .await;
    let contato_id = created["compras"][0]["contatos"][0]["id"].as_i64().unwrap();

    // an event in the same store carrying a foreign owner field
    let (status, foreign) = post(
        &app,
        "/api/eventos",
        Some("renata"),
        json!({ "data": "2024-01-15", "titulo": "Alheio", "responsavel": "marcos" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(foreign["userId"], "marcos");

    let (status, body) = get(
        &app,
        "/api/eventos?from=2024-01-01&to=2024-01-31",
        Some("renata"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 2);

    // ordered by date: synthetic contact entry first
    assert_eq!(items[0]["id"], format!("contact-{contato_id}"));
    assert_eq!(items[0]["data"], "2024-01-05");
    assert_eq!(items[0]["tipo"], "contato");
    assert_eq!(items[0]["titulo"], "Contato pós-venda: Fernanda");
    assert_eq!(items[1]["titulo"], "Campanha de janeiro");

    // nothing from marcos leaks in, and marcos sees nothing here either
    assert!(items.iter().all(|e| e["titulo"] != "Alheio"));
    let (_, body) = get(
        &app,
        "/api/eventos?from=2024-01-01&to=2024-01-31",
        Some("marcos"),
    )
    .await;
    assert_eq!(body.as_array().unwrap().len(), 0);

    // the synthetic entry is never persisted as an event
    let (_, body) = get(&app, "/api/eventos", Some("renata")).await;
    let stored = body.as_array().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0]["titulo"], "Campanha de janeiro");
}

#[tokio::test]
async fn referenced_client_must_belong_to_the_requester() {
    let tmp = tempfile::tempdir().unwrap();
    let app = common::test_app(tmp.path());

    let (_, cliente) = post(
        &app,
        "/api/clientes",
        Some("renata"),
        json!({ "nome": "Gustavo" }),
    )
    .await;
    let cliente_id = cliente["id"].as_i64().unwrap();

    // unknown client id
    let (status, body) = post(
        &app,
        "/api/eventos",
        Some("renata"),
        json!({ "data": "2024-03-01", "titulo": "Entrega", "clienteId": 999 }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    // own client works
    let (status, created) = post(
        &app,
        "/api/eventos",
        Some("renata"),
        json!({ "data": "2024-03-01", "titulo": "Entrega", "clienteId": cliente_id }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["clienteId"], cliente_id);
}

#[tokio::test]
async fn event_update_and_delete_follow_patch_and_acl_rules() {
    let tmp = tempfile::tempdir().unwrap();
    let app = common::test_app(tmp.path());

    let (_, created) = post(
        &app,
        "/api/eventos",
        Some("renata"),
        json!({
            "data": "2024-04-02",
            "titulo": "Mutirão de exames",
            "descricao": "Agendar oftalmologista parceiro",
            "cor": "#16a34a"
        }),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    // absent keeps, null clears
    let (status, body) = put(
        &app,
        &format!("/api/eventos/{id}"),
        Some("renata"),
        json!({ "descricao": null, "concluido": true }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["descricao"], json!(null));
    assert_eq!(body["cor"], "#16a34a");
    // completed-flag aliases all reflect the new value
    assert_eq!(body["concluido"], true);
    assert_eq!(body["completed"], true);
    assert_eq!(body["realizado"], true);

    // titulo cannot be nulled
    let (status, _) = put(
        &app,
        &format!("/api/eventos/{id}"),
        Some("renata"),
        json!({ "titulo": null }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // another user's store simply does not contain the event
    let (status, _) = put(
        &app,
        &format!("/api/eventos/{id}"),
        Some("marcos"),
        json!({ "titulo": "Sequestro" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = delete(&app, &format!("/api/eventos/{id}"), Some("renata")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(true));

    let (status, _) = delete(&app, &format!("/api/eventos/{id}"), Some("renata")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
