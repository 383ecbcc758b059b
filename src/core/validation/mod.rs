//! Form validation
//!
//! Native (browser-style) constraint validation for the bill creation form
//! and the attachment extension allow-list.

pub mod attachment;
pub mod constraints;
pub mod form;

pub use attachment::AttachmentPolicy;
pub use constraints::{Constraint, InputKind, Validity};
pub use form::{FileInput, FormField, NewBillForm, SelectedFile};
