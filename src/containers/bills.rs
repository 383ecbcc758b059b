//! Bills page controller

use crate::core::bill::{BillRow, sort_rows};
use crate::core::error::BilledResult;
use crate::core::session::UserSession;
use crate::core::store::BillStore;
use crate::router::{Navigator, Route};
use crate::views::{ActiveIcon, Document, ViewRenderer};
use std::sync::Arc;

/// Width the proof preview is rendered at
pub const PROOF_WIDTH: u32 = 400;

/// A row's preview icon, as found in the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconEye {
    pub bill_url: String,
}

/// Controller of the Bills page
pub struct BillsController {
    document: Document,
    navigator: Arc<dyn Navigator>,
    store: Arc<dyn BillStore>,
    session: UserSession,
    renderer: Arc<ViewRenderer>,
}

impl BillsController {
    pub fn new(
        document: Document,
        navigator: Arc<dyn Navigator>,
        store: Arc<dyn BillStore>,
        session: UserSession,
        renderer: Arc<ViewRenderer>,
    ) -> Self {
        Self {
            document,
            navigator,
            store,
            session,
            renderer,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The user's bills with display dates, most recent first
    ///
    /// A session without an email owns no bills; the store is not queried.
    pub async fn get_bills(&self) -> BilledResult<Vec<BillRow>> {
        let Some(owner) = self.session.email.as_deref() else {
            tracing::debug!("session has no email, no bills to list");
            return Ok(Vec::new());
        };
        let bills = self.store.list(Some(owner)).await?;

        let mut rows: Vec<BillRow> = bills
            .iter()
            .map(|bill| {
                if bill.parsed_date().is_none() {
                    tracing::warn!(bill_id = %bill.id, date = %bill.date, "unparsable bill date");
                }
                BillRow::formatted(bill)
            })
            .collect();
        sort_rows(&mut rows);

        tracing::debug!(count = rows.len(), "bills fetched");
        Ok(rows)
    }

    /// Markup of the Bills page; a store failure yields the error page
    pub async fn list(&self) -> String {
        let rendered = self
            .get_bills()
            .await
            .and_then(|rows| self.renderer.bill_rows(rows));

        rendered.unwrap_or_else(|e| {
            tracing::error!(error = %e, "bills page failed");
            self.renderer.error(ActiveIcon::Bills, &e.to_string())
        })
    }

    /// Render the page into the document
    pub async fn mount(&self) {
        let markup = self.list().await;
        self.document.set_body(markup);
    }

    /// Preview icons present in the document, in row order
    pub fn icons(&self) -> Vec<IconEye> {
        self.document
            .query_all_by_test_id("icon-eye")
            .into_iter()
            .map(|e| IconEye {
                bill_url: e.attr("data-bill-url").unwrap_or_default().to_string(),
            })
            .collect()
    }

    /// Open the proof preview modal for `icon`
    pub fn handle_click_icon_eye(&self, icon: &IconEye) -> BilledResult<()> {
        let modal = self.renderer.modal(&icon.bill_url, PROOF_WIDTH)?;
        self.document.show_modal(modal);
        Ok(())
    }

    pub fn handle_click_new_bill(&self) {
        self.navigator.navigate(Route::NewBill);
    }
}
