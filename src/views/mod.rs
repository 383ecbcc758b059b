//! Page views
//!
//! Views are pure functions of their payload: each one renders an HTML
//! string from embedded `tera` templates. They know nothing about stores,
//! sessions or navigation.

pub mod dom;

use crate::core::bill::{Bill, BillRow, EXPENSE_TYPES, sort_rows};
use crate::core::error::{BilledResult, ViewError};
use crate::core::validation::{AttachmentPolicy, FormField, NewBillForm};
use std::collections::HashMap;
use tera::{Context, Tera};

pub use dom::{Document, Element};

const TEMPLATES: [(&str, &str); 6] = [
    (
        "vertical_layout.html",
        include_str!("../../templates/vertical_layout.html"),
    ),
    ("bills.html", include_str!("../../templates/bills.html")),
    ("new_bill.html", include_str!("../../templates/new_bill.html")),
    ("loading.html", include_str!("../../templates/loading.html")),
    ("error.html", include_str!("../../templates/error.html")),
    ("modal.html", include_str!("../../templates/modal.html")),
];

/// Which navigation icon is highlighted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveIcon {
    Bills,
    NewBill,
    None,
}

impl ActiveIcon {
    fn as_str(&self) -> &'static str {
        match self {
            ActiveIcon::Bills => "bills",
            ActiveIcon::NewBill => "new_bill",
            ActiveIcon::None => "",
        }
    }
}

/// Renders every page of the application
#[derive(Debug, Clone)]
pub struct ViewRenderer {
    tera: Tera,
    attachments: AttachmentPolicy,
}

impl ViewRenderer {
    pub fn new() -> BilledResult<Self> {
        Self::with_policy(AttachmentPolicy::default())
    }

    /// Renderer whose file input advertises `attachments`
    pub fn with_policy(attachments: AttachmentPolicy) -> BilledResult<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES)
            .map_err(|e| ViewError::Render {
                template: "*".to_string(),
                message: e.to_string(),
            })?;
        Ok(Self { tera, attachments })
    }

    fn render(&self, template: &str, context: &Context) -> BilledResult<String> {
        self.tera.render(template, context).map_err(|e| {
            ViewError::Render {
                template: template.to_string(),
                message: render_error_chain(&e),
            }
            .into()
        })
    }

    /// Bills page from raw store data, most recent first, dates unchanged
    pub fn bills(&self, bills: &[Bill]) -> BilledResult<String> {
        let rows: Vec<BillRow> = bills.iter().map(BillRow::raw).collect();
        self.bill_rows(rows)
    }

    /// Bills page from prepared rows, most recent first
    pub fn bill_rows(&self, mut rows: Vec<BillRow>) -> BilledResult<String> {
        sort_rows(&mut rows);
        let mut context = Context::new();
        context.insert("active", ActiveIcon::Bills.as_str());
        context.insert("rows", &rows);
        self.render("bills.html", &context)
    }

    /// Empty creation form
    pub fn new_bill(&self) -> BilledResult<String> {
        self.new_bill_form(&NewBillForm::new(), &[])
    }

    /// Creation form showing `form` values and flagging `invalid_fields`
    pub fn new_bill_form(&self, form: &NewBillForm, invalid_fields: &[String]) -> BilledResult<String> {
        let values: HashMap<&str, &str> = FormField::ALL
            .iter()
            .map(|f| (f.test_id(), form.value(*f)))
            .collect();
        let accept = self
            .attachments
            .allowed()
            .iter()
            .map(|e| format!(".{}", e))
            .collect::<Vec<_>>()
            .join(",");

        let mut context = Context::new();
        context.insert("active", ActiveIcon::NewBill.as_str());
        context.insert("expense_types", &EXPENSE_TYPES);
        context.insert("values", &values);
        context.insert("accept", &accept);
        context.insert("invalid_fields", invalid_fields);
        self.render("new_bill.html", &context)
    }

    pub fn loading(&self, active: ActiveIcon) -> BilledResult<String> {
        let mut context = Context::new();
        context.insert("active", active.as_str());
        self.render("loading.html", &context)
    }

    /// Error page showing `message` verbatim
    ///
    /// Never fails: falls back to a bare page when the template cannot render.
    pub fn error(&self, active: ActiveIcon, message: &str) -> String {
        let mut context = Context::new();
        context.insert("active", active.as_str());
        context.insert("message", message);
        self.render("error.html", &context).unwrap_or_else(|e| {
            tracing::error!(error = %e, "error page failed to render");
            format!(
                "<div data-testid=\"error-message\">{}</div>",
                tera::escape_html(message)
            )
        })
    }

    /// Proof preview modal for the attachment at `url`
    pub fn modal(&self, url: &str, width: u32) -> BilledResult<String> {
        let mut context = Context::new();
        context.insert("url", url);
        context.insert("width", &width);
        self.render("modal.html", &context)
    }
}

fn render_error_chain(error: &tera::Error) -> String {
    let mut message = error.to_string();
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
