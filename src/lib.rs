//! # Billed
//!
//! Employee pages of an expense-report application: the list of the
//! connected employee's bills and the form creating a new one.
//!
//! ## Features
//!
//! - **Bills page**: bills fetched from a [`BillStore`](core::BillStore),
//!   most recent first, with French display dates and status labels
//! - **Proof preview**: each row opens its attachment in a modal
//! - **NewBill form**: native constraint validation, attachment extension
//!   allow-list, two-step upload then record write
//! - **Typed views**: `tera` templates rendered into a queryable [`Document`](views::Document)
//! - **HTTP exposure**: axum routes serving both pages
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use billed::prelude::*;
//! use std::sync::Arc;
//!
//! let session = UserSession::employee("a@a");
//! let sessions = Arc::new(InMemorySessionStorage::with_user(&session)?);
//! let app = App::new(Arc::new(InMemoryBillStore::default()), sessions, AttachmentPolicy::default())?;
//!
//! let page = app.on_navigate(Route::Bills).await?;
//! assert!(page.document().has_text("Mes notes de frais"));
//! ```

pub mod config;
pub mod containers;
pub mod core;
pub mod router;
pub mod server;
pub mod storage;
pub mod views;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        Bill, BillRow, BillStatus, BillStore, BillUpdate, BilledError, BilledResult, FileUpload,
        InMemorySessionStorage, SessionStorage, UploadReceipt, UserSession, UserType,
        error::StoreError,
        validation::{AttachmentPolicy, FileInput, FormField, NewBillForm, SelectedFile},
    };

    // === Controllers ===
    pub use crate::containers::{
        BillsController, FileChange, FileStage, IconEye, NewBillController, SubmitEvent,
        SubmitOutcome,
    };

    // === Routing and views ===
    pub use crate::router::{App, NavigationLog, Navigator, Page, Route, RouteNavigator};
    pub use crate::views::{ActiveIcon, Document, Element, ViewRenderer};

    // === Storage ===
    pub use crate::storage::{InMemoryBillStore, StoreOperation};

    // === Config ===
    pub use crate::config::BilledConfig;

    // === Server ===
    pub use crate::server::ServerBuilder;

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
}
