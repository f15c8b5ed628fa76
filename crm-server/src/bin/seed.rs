//! One-shot seeding script
//!
//! Populates a sample client with purchase/contact history and a calendar
//! event in each roster user's store. Safe to run repeatedly; every run
//! appends fresh records.
//!
//! Run: `cargo run -p crm-server --bin seed`

use serde_json::json;

use crm_server::db::repository::{client, event};
use crm_server::identity::roster;
use crm_server::utils::time::format_date;
use crm_server::{Config, ServerState, setup_environment};
use shared::models::{ClientCreate, EventCreate};
use shared::util::today;

fn sample_client(user: &str) -> ClientCreate {
    serde_json::from_value(json!({
        "nome": format!("Cliente Exemplo ({user})"),
        "telefone": "(11) 99999-0000",
        "email": format!("exemplo.{user}@otica.local"),
        "genero": "feminino",
        "interesses": ["Lentes multifocais", "Armações"],
        "compras": [{
            "data": "2024-03-10",
            "armacao": "Ray-Ban RB5154",
            "lente": "Multifocal antirreflexo",
            "valorArmacao": 620.0,
            "valorLente": 980.0,
            "notaFiscal": "NF-000123",
            "receita": {
                "od": { "esferico": "-1.25", "cilindrico": "-0.50", "eixo": "90" },
                "oe": { "esferico": "-1.00", "cilindrico": "-0.75", "eixo": "85" }
            },
            "contatos": [
                { "meses": 3 },
                { "meses": 6 }
            ]
        }]
    }))
    .expect("sample client payload is valid")
}

fn sample_event() -> EventCreate {
    serde_json::from_value(json!({
        "data": format_date(today()),
        "titulo": "Revisão de estoque de lentes",
        "descricao": "Conferir lentes de contato próximas do vencimento",
        "cor": "#2563eb"
    }))
    .expect("sample event payload is valid")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_environment();

    let config = Config::from_env();
    let state = ServerState::initialize(&config);

    tracing::info!(
        backend = state.stores.backend().as_str(),
        "Seeding stores for {} users",
        roster::USERS.len()
    );

    for user in roster::USERS {
        let db = state.stores.for_user(user.id).await?;

        let created = client::create(&db, sample_client(user.id), user.id).await?;
        tracing::info!(user = user.id, cliente = created.id, "Seeded client");

        let ev = event::create(&db, sample_event(), user.id).await?;
        tracing::info!(user = user.id, evento = ev.id, "Seeded event");
    }

    tracing::info!("Seed complete");
    Ok(())
}
