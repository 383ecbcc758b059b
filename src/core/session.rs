//! User session context
//!
//! The connected user is persisted as JSON under the [`USER_KEY`] entry of a
//! key-value [`SessionStorage`]. Controllers never read the storage ad hoc:
//! the session is loaded once and handed to them as a [`UserSession`].

use super::error::SessionError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use validator::Validate;

/// Storage key holding the serialized user
pub const USER_KEY: &str = "user";

/// Role of the connected user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserType {
    Employee,
    Admin,
}

/// The connected user, as persisted in session storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct UserSession {
    #[serde(rename = "type")]
    pub user_type: UserType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(email)]
    pub email: Option<String>,
}

impl UserSession {
    pub fn employee(email: impl Into<String>) -> Self {
        Self {
            user_type: UserType::Employee,
            email: Some(email.into()),
        }
    }

    /// Load the user stored under [`USER_KEY`]
    pub fn load(storage: &dyn SessionStorage) -> Result<Self, SessionError> {
        let raw = storage.get_item(USER_KEY).ok_or_else(|| SessionError::Missing {
            key: USER_KEY.to_string(),
        })?;

        let session: Self = serde_json::from_str(&raw).map_err(|e| SessionError::Malformed {
            message: e.to_string(),
        })?;

        session.validate().map_err(|e| SessionError::Malformed {
            message: e.to_string(),
        })?;

        Ok(session)
    }

    /// Persist this user under [`USER_KEY`]
    pub fn store(&self, storage: &dyn SessionStorage) -> Result<(), SessionError> {
        let raw = serde_json::to_string(self).map_err(|e| SessionError::Malformed {
            message: e.to_string(),
        })?;
        storage.set_item(USER_KEY, raw);
        Ok(())
    }

    pub fn is_employee(&self) -> bool {
        self.user_type == UserType::Employee
    }
}

/// Key-value storage for session state (the browser's `localStorage`)
pub trait SessionStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;

    fn set_item(&self, key: &str, value: String);

    fn clear(&self);
}

/// In-memory session storage for tests and the development server
#[derive(Debug, Default)]
pub struct InMemorySessionStorage {
    items: RwLock<HashMap<String, String>>,
}

impl InMemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-populated with a user
    pub fn with_user(session: &UserSession) -> Result<Self, SessionError> {
        let storage = Self::new();
        session.store(&storage)?;
        Ok(storage)
    }
}

impl SessionStorage for InMemorySessionStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set_item(&self, key: &str, value: String) {
        self.items
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value);
    }

    fn clear(&self) {
        self.items
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
