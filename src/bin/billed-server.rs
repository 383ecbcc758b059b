//! Development server for the employee pages
//!
//! Reads its configuration from the YAML file named by `BILLED_CONFIG`, or
//! uses the defaults. The in-memory store starts with a few bills owned by
//! the configured user.

use billed::prelude::*;
use serde_json::json;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("billed=info,tower_http=info")),
        )
        .init();

    let config = match std::env::var("BILLED_CONFIG") {
        Ok(path) => {
            tracing::info!(%path, "loading configuration");
            BilledConfig::from_yaml_file(&path)?
        }
        Err(_) => BilledConfig::default_config(),
    };

    let store = InMemoryBillStore::with_bills(
        config.uploads.base_url.clone(),
        demo_bills(&config.session.email)?,
    );
    tracing::info!(bills = store.len(), email = %config.session.email, "store seeded");

    ServerBuilder::new()
        .with_config(config)
        .with_store(store)
        .serve()
        .await
}

fn demo_bills(email: &str) -> Result<Vec<Bill>> {
    let bills = serde_json::from_value(json!([
        {
            "id": "demo-hotel",
            "email": email,
            "type": "Hôtel et logement",
            "name": "encore",
            "amount": 400,
            "date": "2004-04-04",
            "vat": "80",
            "pct": 20,
            "commentary": "séminaire billed",
            "fileName": "preview-facture-free-201801-pdf-1.jpg",
            "fileUrl": "https://test.storage.tld/bills/preview-facture-free-201801-pdf-1.jpg",
            "status": "pending"
        },
        {
            "id": "demo-transports",
            "email": email,
            "type": "Transports",
            "name": "test1",
            "amount": 100,
            "date": "2001-01-01",
            "vat": "",
            "pct": 20,
            "commentAdmin": "ok",
            "fileName": "1592770761.jpeg",
            "fileUrl": "https://test.storage.tld/bills/1592770761.jpeg",
            "status": "refused"
        },
        {
            "id": "demo-services",
            "email": email,
            "type": "Services en ligne",
            "name": "test3",
            "amount": 300,
            "date": "2003-03-03",
            "vat": "60",
            "pct": 20,
            "commentAdmin": "bon bah d'accord",
            "fileName": "facture-client.png",
            "fileUrl": "https://test.storage.tld/bills/facture-client.png",
            "status": "accepted"
        }
    ]))?;
    Ok(bills)
}
