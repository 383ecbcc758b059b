//! Bill store abstraction
//!
//! Controllers talk to the persistence layer only through [`BillStore`], which
//! is injected at construction. Uploading an attachment (`create`) and writing
//! the bill record (`update`) are two separate calls: the store assigns the
//! key and file URL on upload, and the record is then written under that key.

use super::bill::Bill;
use super::error::StoreError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// An attachment to upload
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
    /// Owner of the future bill
    pub email: Option<String>,
}

/// What the store answers to an upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadReceipt {
    pub file_url: String,
    pub key: String,
}

/// Write of a bill record under an upload key
#[derive(Debug, Clone)]
pub struct BillUpdate {
    pub selector: String,
    pub data: Bill,
}

/// Remote bill resources
#[async_trait]
pub trait BillStore: Send + Sync {
    /// List bills, restricted to `owner` when given
    async fn list(&self, owner: Option<&str>) -> Result<Vec<Bill>, StoreError>;

    /// Upload an attachment; the store assigns its URL and key
    async fn create(&self, upload: FileUpload) -> Result<UploadReceipt, StoreError>;

    /// Write a bill record under `selector`
    async fn update(&self, update: BillUpdate) -> Result<Bill, StoreError>;
}
