//! Page controllers
//!
//! Each controller owns the document of one page view and receives its
//! collaborators (store, session, navigator) at construction.

pub mod bills;
pub mod new_bill;

pub use bills::{BillsController, IconEye};
pub use new_bill::{FileChange, FileStage, NewBillController, SubmitEvent, SubmitOutcome};
