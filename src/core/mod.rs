//! Core module containing the bill model, session context and store contract

pub mod bill;
pub mod error;
pub mod session;
pub mod store;
pub mod validation;

pub use bill::{Bill, BillRow, BillStatus};
pub use error::{BilledError, BilledResult};
pub use session::{InMemorySessionStorage, SessionStorage, UserSession, UserType};
pub use store::{BillStore, BillUpdate, FileUpload, UploadReceipt};
