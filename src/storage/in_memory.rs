//! In-memory implementation of BillStore for testing and development
//!
//! Besides holding bills and uploaded attachments, the store can be told to
//! reject its next call of a given operation, which is how tests exercise the
//! failure paths of the controllers.

use crate::core::bill::Bill;
use crate::core::error::StoreError;
use crate::core::store::{BillStore, BillUpdate, FileUpload, UploadReceipt};
use async_trait::async_trait;
use indexmap::IndexMap;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, PoisonError, RwLock};
use uuid::Uuid;

/// Store operation, used to target injected failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    List,
    Create,
    Update,
}

/// An uploaded attachment
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
    pub email: Option<String>,
}

/// In-memory bill store
///
/// Uses RwLock for thread-safe access. Clones share the same data.
#[derive(Clone)]
pub struct InMemoryBillStore {
    bills: Arc<RwLock<IndexMap<String, Bill>>>,
    files: Arc<RwLock<HashMap<String, StoredFile>>>,
    failures: Arc<RwLock<HashMap<StoreOperation, VecDeque<StoreError>>>>,
    base_url: String,
}

impl InMemoryBillStore {
    /// Create an empty store assigning file URLs under `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            bills: Arc::new(RwLock::new(IndexMap::new())),
            files: Arc::new(RwLock::new(HashMap::new())),
            failures: Arc::new(RwLock::new(HashMap::new())),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Create a store holding `bills`, in that order
    pub fn with_bills(base_url: impl Into<String>, bills: Vec<Bill>) -> Self {
        let store = Self::new(base_url);
        {
            let mut map = store.bills.write().unwrap_or_else(PoisonError::into_inner);
            for bill in bills {
                map.insert(bill.id.clone(), bill);
            }
        }
        store
    }

    /// Reject the next call of `operation` with `error`
    ///
    /// Failures queue up: each call consumes one.
    pub fn fail_next(&self, operation: StoreOperation, error: StoreError) {
        self.failures
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(operation)
            .or_default()
            .push_back(error);
    }

    /// Uploaded attachment stored under `key`
    pub fn file(&self, key: &str) -> Option<StoredFile> {
        self.files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Number of bill records
    pub fn len(&self) -> usize {
        self.bills.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn take_failure(&self, operation: StoreOperation) -> Result<(), StoreError> {
        let mut failures = self.failures.write().map_err(|e| StoreError::Unavailable {
            message: format!("Failed to acquire write lock: {}", e),
        })?;

        match failures.get_mut(&operation).and_then(VecDeque::pop_front) {
            Some(error) => {
                tracing::debug!(?operation, %error, "injected store failure");
                Err(error)
            }
            None => Ok(()),
        }
    }
}

impl Default for InMemoryBillStore {
    fn default() -> Self {
        Self::new("http://localhost:5678/uploads")
    }
}

#[async_trait]
impl BillStore for InMemoryBillStore {
    async fn list(&self, owner: Option<&str>) -> Result<Vec<Bill>, StoreError> {
        self.take_failure(StoreOperation::List)?;

        let bills = self.bills.read().map_err(|e| StoreError::Unavailable {
            message: format!("Failed to acquire read lock: {}", e),
        })?;

        Ok(bills
            .values()
            .filter(|bill| owner.is_none_or(|email| bill.email == email))
            .cloned()
            .collect())
    }

    async fn create(&self, upload: FileUpload) -> Result<UploadReceipt, StoreError> {
        self.take_failure(StoreOperation::Create)?;

        let key = Uuid::new_v4().to_string();
        let file_url = format!(
            "{}/{}/{}",
            self.base_url,
            key,
            urlencoding::encode(&upload.file_name)
        );

        let mut files = self.files.write().map_err(|e| StoreError::Unavailable {
            message: format!("Failed to acquire write lock: {}", e),
        })?;

        files.insert(
            key.clone(),
            StoredFile {
                file_name: upload.file_name,
                content_type: upload.content_type,
                bytes: upload.bytes,
                email: upload.email,
            },
        );

        Ok(UploadReceipt { file_url, key })
    }

    async fn update(&self, update: BillUpdate) -> Result<Bill, StoreError> {
        self.take_failure(StoreOperation::Update)?;

        let known_upload = self
            .files
            .read()
            .map_err(|e| StoreError::Unavailable {
                message: format!("Failed to acquire read lock: {}", e),
            })?
            .contains_key(&update.selector);

        let mut bills = self.bills.write().map_err(|e| StoreError::Unavailable {
            message: format!("Failed to acquire write lock: {}", e),
        })?;

        if !known_upload && !bills.contains_key(&update.selector) {
            return Err(StoreError::NotFound {
                selector: update.selector,
            });
        }

        let mut bill = update.data;
        bill.id = update.selector.clone();

        bills.insert(update.selector, bill.clone());

        Ok(bill)
    }
}
