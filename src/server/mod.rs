//! HTTP server for the employee pages
//!
//! [`ServerBuilder`] assembles the store, the session and the templates into
//! an axum `Router` serving the Bills and NewBill pages.

pub mod builder;
pub mod router;

pub use builder::ServerBuilder;
pub use router::{AppState, build_page_routes};
