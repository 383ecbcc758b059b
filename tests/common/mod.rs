//! Shared fixtures for the integration tests
//!
//! ```rust,ignore
//! mod common;
//! use common::*;
//! ```

#![allow(dead_code)]

use billed::prelude::*;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const EMPLOYEE_EMAIL: &str = "a@a";

/// The four bills of the reference data set, in store order
pub fn bills() -> Vec<Bill> {
    serde_json::from_value(json!([
        {
            "id": "47qAXb6fIm2zOKkLzMro",
            "vat": "80",
            "fileUrl": "https://test.storage.tld/v0/b/billable-677b6.appspot.com/o/preview-facture-free-201801-pdf-1.jpg",
            "status": "pending",
            "type": "Hôtel et logement",
            "commentary": "séminaire billed",
            "name": "encore",
            "fileName": "preview-facture-free-201801-pdf-1.jpg",
            "date": "2004-04-04",
            "amount": 400,
            "commentAdmin": "ok",
            "email": "a@a",
            "pct": 20
        },
        {
            "id": "BeKy5Mo4jkmdfPGYpTxZ",
            "vat": "",
            "amount": 100,
            "name": "test1",
            "fileName": "1592770761.jpeg",
            "commentary": "plop",
            "pct": 20,
            "type": "Transports",
            "email": "a@a",
            "fileUrl": "https://test.storage.tld/v0/b/billable-677b6.appspot.com/o/1592770761.jpeg",
            "date": "2001-01-01",
            "status": "refused",
            "commentAdmin": "en fait non"
        },
        {
            "id": "UIUZtnPQvnbFnB0ozvJh",
            "name": "test3",
            "email": "a@a",
            "type": "Services en ligne",
            "vat": "60",
            "pct": 20,
            "commentAdmin": "bon bah d'accord",
            "amount": 300,
            "status": "accepted",
            "date": "2003-03-03",
            "commentary": "",
            "fileName": "facture-client-php-exportee-dans-document-pdf-enregistre-sur-disque-dur.png",
            "fileUrl": "https://test.storage.tld/v0/b/billable-677b6.appspot.com/o/facture-client.png"
        },
        {
            "id": "qcCK3SzECmaZAGRrHjaC",
            "name": "test2",
            "email": "a@a",
            "type": "Restaurants et bars",
            "vat": "40",
            "pct": 20,
            "commentAdmin": "pas la bonne facture",
            "amount": 200,
            "status": "refused",
            "date": "2002-02-02",
            "commentary": "test2",
            "fileName": "preview-facture-free-201801-pdf-1.jpg",
            "fileUrl": "https://test.storage.tld/v0/b/billable-677b6.appspot.com/o/preview-facture-free-201801-pdf-1.jpg"
        }
    ]))
    .expect("fixture bills deserialize")
}

pub fn employee() -> UserSession {
    UserSession::employee(EMPLOYEE_EMAIL)
}

pub fn sessions() -> Arc<InMemorySessionStorage> {
    Arc::new(InMemorySessionStorage::with_user(&employee()).expect("session stores"))
}

pub fn seeded_store() -> InMemoryBillStore {
    InMemoryBillStore::with_bills("https://test.storage.tld/uploads", bills())
}

/// App over `store` with the employee connected
pub fn app_with(store: InMemoryBillStore) -> App {
    App::new(Arc::new(store), sessions(), AttachmentPolicy::default()).expect("app builds")
}

pub fn renderer() -> Arc<ViewRenderer> {
    Arc::new(ViewRenderer::new().expect("templates parse"))
}

pub fn png(name: &str) -> SelectedFile {
    SelectedFile::new(name, "image/png", b"\x89PNG".to_vec())
}

/// A form filled with values every control accepts
pub fn valid_form() -> NewBillForm {
    let mut form = NewBillForm::new();
    form.change(FormField::ExpenseType, "Hôtel et logement");
    form.change(FormField::ExpenseName, "Déplacement");
    form.change(FormField::Amount, "150");
    form.change(FormField::Date, "2024-01-02");
    form.change(FormField::Vat, "80");
    form.change(FormField::Pct, "25");
    form.change(FormField::Commentary, "Séminaire");
    form.file_mut().select(png("facture.png"));
    form
}

/// Counts how many times an event handler fired
#[derive(Debug, Clone, Default)]
pub struct CallCounter {
    calls: Arc<AtomicUsize>,
}

impl CallCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    pub fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}
