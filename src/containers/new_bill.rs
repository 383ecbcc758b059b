//! NewBill page controller
//!
//! The attachment goes through `Empty → Staged → Uploaded → Submitted`.
//! Picking a file with a refused extension clears the input and leaves the
//! stage at `Empty`. Submitting only reaches the store when every control of
//! the form passes its native constraints.

use crate::core::bill::{Bill, BillStatus, DEFAULT_PCT};
use crate::core::error::{BilledResult, ValidationError};
use crate::core::session::UserSession;
use crate::core::store::{BillStore, BillUpdate, FileUpload, UploadReceipt};
use crate::core::validation::{AttachmentPolicy, FileInput, FormField, NewBillForm, SelectedFile};
use crate::router::{Navigator, Route};
use crate::views::Document;
use std::sync::Arc;

/// Where the attachment stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStage {
    Empty,
    Staged(SelectedFile),
    Uploaded {
        file_name: String,
        receipt: UploadReceipt,
    },
    Submitted,
}

/// Result of a file input change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileChange {
    Staged { file_name: String },
    Rejected { file_name: String },
    Cleared,
}

/// The form's `submit` event
#[derive(Debug, Clone)]
pub struct SubmitEvent {
    pub form: NewBillForm,
    default_prevented: bool,
}

impl SubmitEvent {
    pub fn new(form: NewBillForm) -> Self {
        Self {
            form,
            default_prevented: false,
        }
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Result of a submission
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Native validation refused the form; nothing was sent
    Blocked { invalid_fields: Vec<String> },
    /// The bill was stored and the Bills page requested
    Created(Bill),
}

/// Controller of the NewBill page
pub struct NewBillController {
    document: Document,
    navigator: Arc<dyn Navigator>,
    store: Arc<dyn BillStore>,
    session: UserSession,
    attachments: AttachmentPolicy,
    stage: FileStage,
}

impl NewBillController {
    pub fn new(
        document: Document,
        navigator: Arc<dyn Navigator>,
        store: Arc<dyn BillStore>,
        session: UserSession,
        attachments: AttachmentPolicy,
    ) -> Self {
        Self {
            document,
            navigator,
            store,
            session,
            attachments,
            stage: FileStage::Empty,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn stage(&self) -> &FileStage {
        &self.stage
    }

    /// Name of the staged or uploaded attachment
    pub fn file_name(&self) -> Option<&str> {
        match &self.stage {
            FileStage::Staged(file) => Some(&file.name),
            FileStage::Uploaded { file_name, .. } => Some(file_name),
            FileStage::Empty | FileStage::Submitted => None,
        }
    }

    /// React to the file input's `change` event
    pub fn handle_change_file(&mut self, input: &mut FileInput) -> FileChange {
        let Some(file) = input.files().first().cloned() else {
            self.stage = FileStage::Empty;
            return FileChange::Cleared;
        };

        if let Err(e) = self.attachments.check(&file.name) {
            tracing::debug!(error = %e, "attachment refused");
            input.clear();
            self.stage = FileStage::Empty;
            return FileChange::Rejected {
                file_name: file.name,
            };
        }

        let file_name = file.name.clone();
        self.stage = FileStage::Staged(file);
        FileChange::Staged { file_name }
    }

    /// React to the form's `submit` event
    pub async fn handle_submit(&mut self, event: &mut SubmitEvent) -> BilledResult<SubmitOutcome> {
        event.prevent_default();

        let invalid_fields = event.form.invalid_fields();
        if !invalid_fields.is_empty() {
            tracing::debug!(?invalid_fields, "submission blocked by native validation");
            return Ok(SubmitOutcome::Blocked { invalid_fields });
        }

        let file = self.staged_file(event.form.file())?;
        let file_name = file.name.clone();

        let receipt = self
            .store
            .create(FileUpload {
                file_name: file.name,
                content_type: file.content_type,
                bytes: file.bytes,
                email: self.session.email.clone(),
            })
            .await?;
        tracing::info!(key = %receipt.key, file_url = %receipt.file_url, "attachment uploaded");

        self.stage = FileStage::Uploaded {
            file_name: file_name.clone(),
            receipt: receipt.clone(),
        };

        let bill = self.bill_from(&event.form, &receipt, file_name)?;
        let saved = self
            .store
            .update(BillUpdate {
                selector: receipt.key,
                data: bill,
            })
            .await?;
        tracing::info!(bill_id = %saved.id, "bill created");

        self.stage = FileStage::Submitted;
        self.navigator.navigate(Route::Bills);
        Ok(SubmitOutcome::Created(saved))
    }

    /// The file currently in the input
    ///
    /// A file staged by an earlier `change` is only reused while the input
    /// still holds it; otherwise the input's file is checked afresh.
    fn staged_file(&self, input: &FileInput) -> BilledResult<SelectedFile> {
        let current = input
            .files()
            .first()
            .cloned()
            .ok_or(ValidationError::MissingFile)?;

        if let FileStage::Staged(staged) = &self.stage {
            if *staged == current {
                return Ok(current);
            }
            tracing::debug!(staged = %staged.name, current = %current.name, "input changed since staging");
        }

        self.attachments.check(&current.name)?;
        Ok(current)
    }

    fn bill_from(
        &self,
        form: &NewBillForm,
        receipt: &UploadReceipt,
        file_name: String,
    ) -> BilledResult<Bill> {
        let amount = parse_number(form, FormField::Amount)?
            .ok_or_else(|| ValidationError::InvalidFields(vec![FormField::Amount.to_string()]))?;
        let vat = parse_number(form, FormField::Vat)?;
        let pct = match parse_number(form, FormField::Pct)? {
            Some(p) => whole_percent(p)
                .ok_or_else(|| ValidationError::InvalidFields(vec![FormField::Pct.to_string()]))?,
            None => DEFAULT_PCT,
        };
        let commentary = Some(form.value(FormField::Commentary).to_string()).filter(|c| !c.is_empty());

        Ok(Bill {
            id: String::new(),
            email: self.session.email.clone().unwrap_or_default(),
            expense_type: form.value(FormField::ExpenseType).to_string(),
            name: form.value(FormField::ExpenseName).to_string(),
            amount,
            date: form.value(FormField::Date).to_string(),
            vat,
            pct,
            commentary,
            comment_admin: None,
            file_url: Some(receipt.file_url.clone()),
            file_name: Some(file_name),
            status: BillStatus::Pending,
        })
    }
}

fn parse_number(form: &NewBillForm, field: FormField) -> BilledResult<Option<f64>> {
    let raw = form.value(field);
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<f64>()
        .map(Some)
        .map_err(|_| ValidationError::InvalidFields(vec![field.to_string()]).into())
}

/// `value` as a whole percentage, if it is one
fn whole_percent(value: f64) -> Option<i64> {
    if value.fract() == 0.0 && (0.0..=100.0).contains(&value) {
        Some(value as i64)
    } else {
        None
    }
}
