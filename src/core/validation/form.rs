//! State of the bill creation form
//!
//! [`NewBillForm`] holds the current (sanitized) value of every control of the
//! creation form plus its file input, and answers validity queries the way
//! the browser would before letting a submission through.

use super::constraints::{Constraint, InputKind, Validity};
use crate::core::bill::EXPENSE_TYPES;
use indexmap::IndexMap;
use std::fmt;

/// Text-valued controls of the creation form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    ExpenseType,
    ExpenseName,
    Date,
    Amount,
    Vat,
    Pct,
    Commentary,
}

impl FormField {
    pub const ALL: [FormField; 7] = [
        FormField::ExpenseType,
        FormField::ExpenseName,
        FormField::Date,
        FormField::Amount,
        FormField::Vat,
        FormField::Pct,
        FormField::Commentary,
    ];

    /// `data-testid` (and form `name`) of the control
    pub fn test_id(&self) -> &'static str {
        match self {
            FormField::ExpenseType => "expense-type",
            FormField::ExpenseName => "expense-name",
            FormField::Date => "datepicker",
            FormField::Amount => "amount",
            FormField::Vat => "vat",
            FormField::Pct => "pct",
            FormField::Commentary => "commentary",
        }
    }

    pub fn from_test_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.test_id() == id)
    }

    pub fn constraint(&self) -> Constraint {
        match self {
            FormField::ExpenseType => Constraint::new(InputKind::Select(
                EXPENSE_TYPES.iter().map(|t| t.to_string()).collect(),
            ))
            .required(),
            FormField::ExpenseName => Constraint::new(InputKind::Text),
            FormField::Date => Constraint::new(InputKind::Date).required(),
            FormField::Amount => Constraint::new(InputKind::Number).required(),
            FormField::Vat => Constraint::new(InputKind::Number),
            FormField::Pct => Constraint::new(InputKind::Number)
                .required()
                .step(1.0)
                .range(0.0, 100.0),
            FormField::Commentary => Constraint::new(InputKind::TextArea),
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.test_id())
    }
}

/// `data-testid` of the file input
pub const FILE_TEST_ID: &str = "file";

/// A file picked by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

/// The form's file input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileInput {
    files: Vec<SelectedFile>,
    value: String,
}

impl FileInput {
    /// Simulate the user picking a file (the `change` event payload)
    pub fn select(&mut self, file: SelectedFile) {
        self.value = format!("C:\\fakepath\\{}", file.name);
        self.files = vec![file];
    }

    /// Reset the input to empty
    pub fn clear(&mut self) {
        self.files.clear();
        self.value.clear();
    }

    pub fn files(&self) -> &[SelectedFile] {
        &self.files
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn validity(&self) -> Validity {
        Constraint::new(InputKind::File).required().check(&self.value)
    }
}

/// Values of the creation form
#[derive(Debug, Clone)]
pub struct NewBillForm {
    values: IndexMap<FormField, String>,
    file: FileInput,
}

impl Default for NewBillForm {
    fn default() -> Self {
        Self::new()
    }
}

impl NewBillForm {
    pub fn new() -> Self {
        Self {
            values: FormField::ALL
                .into_iter()
                .map(|f| (f, String::new()))
                .collect(),
            file: FileInput::default(),
        }
    }

    /// Set a control's value (the `change` event), sanitized per its kind
    pub fn change(&mut self, field: FormField, raw: impl AsRef<str>) {
        let sanitized = field.constraint().kind.sanitize(raw.as_ref());
        self.values.insert(field, sanitized);
    }

    pub fn value(&self, field: FormField) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or("")
    }

    pub fn file(&self) -> &FileInput {
        &self.file
    }

    pub fn file_mut(&mut self) -> &mut FileInput {
        &mut self.file
    }

    pub fn validity(&self, field: FormField) -> Validity {
        field.constraint().check(self.value(field))
    }

    /// Test ids of every control failing its constraints, in form order
    pub fn invalid_fields(&self) -> Vec<String> {
        let mut invalid: Vec<String> = self
            .values
            .keys()
            .filter(|f| !self.validity(**f).valid())
            .map(|f| f.test_id().to_string())
            .collect();
        if !self.file.validity().valid() {
            invalid.push(FILE_TEST_ID.to_string());
        }
        invalid
    }

    pub fn check_validity(&self) -> bool {
        self.invalid_fields().is_empty()
    }
}
