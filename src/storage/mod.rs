//! Storage implementations for the bill store

pub mod in_memory;

pub use in_memory::{InMemoryBillStore, StoreOperation};
